use leptos::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-gray-50">
            <div class="max-w-7xl mx-auto py-12 px-4 sm:px-6 lg:px-8">
                <div class="text-center">
                    <h1 class="text-4xl font-extrabold text-gray-900 sm:text-5xl lg:text-6xl">
                        "Hospital Records"
                    </h1>
                    <p class="mt-3 max-w-md mx-auto text-base text-gray-500 sm:text-lg lg:mt-5 lg:text-xl lg:max-w-3xl">
                        "Patient records for administrators, hospital authorities, doctors, staff and patients"
                    </p>
                    <div class="mt-5 max-w-md mx-auto sm:flex sm:justify-center lg:mt-8">
                        <div class="rounded-md shadow">
                            <a href="/login" class="w-full flex items-center justify-center px-8 py-3 border border-transparent text-base font-medium rounded-md text-white bg-blue-600 hover:bg-blue-700 lg:py-4 lg:text-lg lg:px-10">
                                "Login"
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
