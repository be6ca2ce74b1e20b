#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::{LoginResponse, UserRecord};
    use crate::state::auth::{AuthState, Credentials, SessionStore};
    use crate::utils::storage::MemoryStorage;
    use crate::{api::ApiClient, state::access::RouteTable};
    use leptos::*;
    use serde_json::json;
    use std::rc::Rc;

    pub fn with_runtime<T>(f: impl FnOnce() -> T) -> T {
        let runtime = create_runtime();
        let result = f();
        runtime.dispose();
        result
    }

    pub fn user_record(id: &str, role: &str) -> UserRecord {
        UserRecord {
            id: id.into(),
            role: role.into(),
            full_name: Some("Dana Reyes".into()),
            email: Some("dana@example.org".into()),
            hospital_id: Some("h-1".into()),
            department_id: None,
        }
    }

    pub fn login_response(user: UserRecord) -> LoginResponse {
        LoginResponse {
            access: format!("access-{}", user.id),
            refresh: Some(format!("refresh-{}", user.id)),
            user,
        }
    }

    pub fn login_json(id: &str, role: &str) -> serde_json::Value {
        json!({
            "user": {
                "id": id,
                "role": role,
                "full_name": "Dana Reyes",
                "email": "dana@example.org",
                "hospital_id": "h-1",
                "department_id": null
            },
            "access": format!("access-{}", id),
            "refresh": format!("refresh-{}", id)
        })
    }

    pub fn credentials() -> Credentials {
        Credentials {
            identifier: "dana@example.org".into(),
            secret: "secret".into(),
        }
    }

    /// Provides a session store pinned to `state` plus the standard route
    /// table. Must run inside a reactive runtime.
    pub fn provide_auth(state: AuthState) -> SessionStore {
        let store = SessionStore::new(
            Rc::new(ApiClient::new_with_base_url("http://127.0.0.1:9/api")),
            Rc::new(MemoryStorage::new()),
        );
        store.overwrite_state_for_test(state);
        provide_context(store.clone());
        provide_context(RouteTable::standard());
        store
    }
}
