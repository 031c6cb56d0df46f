//! Pieces shared by the auth, business and io services: wire types,
//! request-field coercion, logging setup and the admin listener.

pub mod types;
pub mod fields;
pub mod utils;
pub mod admin_http;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }
}
