pub mod types;
pub mod utils;
pub mod env;
pub mod metrics;
pub mod admin_http;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn error_body_serializes_without_empty_detail() {
        let body = types::ErrorBody::new("Имя и телефон обязательны");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "Имя и телефон обязательны");
        assert!(json.get("detail").is_none());
    }
}
