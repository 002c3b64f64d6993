use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;

pub fn allowed_origins() -> Vec<String> {
    let allowed_origins_env =
        env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    parse_origins(&allowed_origins_env)
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn create_cors() -> Result<rocket_cors::Cors, rocket_cors::Error> {
    let allowed_origins = AllowedOrigins::some_exact(&allowed_origins());

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(|m| m.into())
            .collect(),
        allowed_headers: AllowedHeaders::some(&[
            "Accept",
            "Content-Type",
            "X-Requested-With",
            "X-Session-Id",
        ]),
        expose_headers: ["X-Session-Id".to_string()].into_iter().collect(),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test ,http://b.test,, ,http://c.test:8080 "),
            vec!["http://a.test", "http://b.test", "http://c.test:8080"]
        );
        assert!(parse_origins("").is_empty());
        assert!(parse_origins(" , ,").is_empty());
        assert_eq!(parse_origins("http://localhost:3000"), vec!["http://localhost:3000"]);
    }

    #[test]
    fn parsed_origins_build_cors() {
        let origins = parse_origins("http://a.test, http://b.test");
        let cors = CorsOptions {
            allowed_origins: AllowedOrigins::some_exact(&origins),
            ..Default::default()
        }
        .to_cors();
        assert!(cors.is_ok());
    }
}
