fn main() {
    hospital_records_frontend::start();
}
