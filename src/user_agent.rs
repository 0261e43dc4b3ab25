//! User-Agent header sent with every data service request.

/// `staffdesk/<version>`, the part that identifies the crate.
const PRODUCT: &str = concat!("staffdesk/", env!("CARGO_PKG_VERSION"));

/// Returns `staffdesk/<version> (<os>; <arch>)`, e.g.
/// `staffdesk/0.1.0 (linux; x86_64)`.
pub(crate) fn user_agent() -> String {
    format!("{} ({}; {})", PRODUCT, std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_crate_and_platform() {
        let ua = user_agent();
        assert_eq!(
            ua,
            format!(
                "staffdesk/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            )
        );
        assert!(reqwest::header::HeaderValue::from_str(&ua).is_ok());
    }
}
