
/// DB-free validator tests
pub mod validator_tests {
    use crate::{book, seller};

    #[test]
    fn email_shape() {
        assert!(seller::validate_email("ivan@example.com").is_ok());
        assert!(seller::validate_email("not-an-email").is_err());
        assert!(seller::validate_email("@example.com").is_err());
        assert!(seller::validate_email("ivan@").is_err());
        assert!(seller::validate_email("").is_err());
    }

    #[test]
    fn name_bounds() {
        assert!(seller::validate_name("Ivan", "first_name").is_ok());
        assert!(seller::validate_name("", "first_name").is_err());
        assert!(seller::validate_name(&"x".repeat(101), "last_name").is_err());
    }

    #[test]
    fn year_rule() {
        assert!(book::validate_year(2020).is_ok());
        assert!(book::validate_year(2025).is_ok());
        assert!(book::validate_year(2019).is_err());
        assert!(book::validate_year(1986).is_err());
    }

    #[test]
    fn title_and_author_bounds() {
        assert!(book::validate_title("Clean Architecture").is_ok());
        assert!(book::validate_title(&"x".repeat(51)).is_err());
        assert!(book::validate_author("Robert Martin").is_ok());
        assert!(book::validate_author("").is_err());
    }
}
