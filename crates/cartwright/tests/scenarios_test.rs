//! Scenario catalog and runner tests against the in-memory storefront

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use cartwright::{Scenario, ScenarioRunner, INVALID_SIGNUP_CASES};
use common::{FakeShop, BASE_URL, BOOKS, CELL_PHONES, DOWNLOADS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

mod journey_tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_and_login_signs_in_registered_user() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(1);

        Scenario::SignupAndLogin.run(&session, &mut rng).await.unwrap();

        let accounts = shop.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(shop.signed_in(), Some(accounts[0].email.clone()));
        assert!(accounts[0].date_of_birth.is_some());
        assert!(!accounts[0].company.is_empty());
    }

    #[tokio::test]
    async fn test_signup_and_checkout_ships_to_second_country() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(2);

        Scenario::SignupAndCheckout
            .run(&session, &mut rng)
            .await
            .unwrap();

        let orders = shop.orders();
        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.billing.country, "Angola");
        assert_eq!(order.shipping.country, "Armenia");
        assert_eq!(order.shipping.email, order.billing.email);
        assert_eq!(order.shipping_method, "Next Day Air");
        assert_eq!(order.payment_method, "Check / Money Order");
        assert_eq!(order.items.len(), 1);
        assert!(BOOKS.contains(&order.items[0].0.as_str()));
        assert_eq!(shop.url(), BASE_URL);
    }

    #[tokio::test]
    async fn test_existing_user_checkout_ships_to_billing_address() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(3);

        Scenario::ExistingUserCheckout
            .run(&session, &mut rng)
            .await
            .unwrap();

        let order = &shop.orders()[0];
        assert_eq!(order.shipping, order.billing);
        assert_eq!(order.customer, shop.accounts()[0].email);
        assert!(order.card.is_none());
    }

    #[tokio::test]
    async fn test_cart_functionality_leaves_phone_and_book() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(4);

        Scenario::CartFunctionality
            .run(&session, &mut rng)
            .await
            .unwrap();

        let cart = shop.cart();
        assert_eq!(cart.len(), 2);
        assert!(cart.iter().all(|(name, _)| !DOWNLOADS.contains(&name.as_str())));
        assert!(cart.iter().any(|(name, _)| CELL_PHONES.contains(&name.as_str())));
        let (_, book_quantity) = cart
            .iter()
            .find(|(name, _)| BOOKS.contains(&name.as_str()))
            .unwrap();
        assert!((2..=10).contains(book_quantity));
    }

    #[tokio::test]
    async fn test_every_invalid_signup_is_rejected() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(5);

        for case in INVALID_SIGNUP_CASES {
            let scenario = Scenario::InvalidSignup(case);
            scenario
                .run(&session, &mut rng)
                .await
                .unwrap_or_else(|err| panic!("{scenario}: {err}"));
        }
        assert!(shop.accounts().is_empty());
    }

    #[tokio::test]
    async fn test_slow_pages_are_waited_for() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new().with_latency(3);
        let session = shop.session(dir.path());
        let mut rng = StdRng::seed_from_u64(6);

        Scenario::SignupAndLogin.run(&session, &mut rng).await.unwrap();
        assert!(shop.signed_in().is_some());
    }

    #[tokio::test]
    async fn test_scenario_starts_by_signing_out() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());
        shop.sign_in_as("someone@example.com");
        let mut rng = StdRng::seed_from_u64(7);

        Scenario::SignupAndLogin.run(&session, &mut rng).await.unwrap();
        assert_ne!(shop.signed_in().as_deref(), Some("someone@example.com"));
    }
}

mod runner_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_catalog_passes() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new();
        let session = shop.session(dir.path());

        let report = ScenarioRunner::new()
            .with_seed(Some(42))
            .run(&session, &Scenario::catalog())
            .await;

        assert!(report.all_passed(), "{:?}", report.failures());
        assert_eq!(report.seed, 42);
        assert_eq!(report.total(), Scenario::catalog().len());
        assert_eq!(shop.orders().len(), 2);
    }

    #[tokio::test]
    async fn test_same_seed_same_identities() {
        let mut names = Vec::new();
        for _ in 0..2 {
            let dir = TempDir::new().unwrap();
            let shop = FakeShop::new();
            let session = shop.session(dir.path());
            ScenarioRunner::new()
                .with_seed(Some(99))
                .run(&session, &[Scenario::SignupAndLogin])
                .await;
            let account = &shop.accounts()[0];
            names.push((account.first_name.clone(), account.last_name.clone()));
        }
        assert_eq!(names[0], names[1]);
    }

    #[tokio::test]
    async fn test_fail_fast_records_context_and_skips_rest() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new().with_completion_title("Something went wrong");
        let session = shop.session(dir.path());

        let report = ScenarioRunner::new()
            .with_fail_fast()
            .with_seed(Some(8))
            .run(
                &session,
                &[Scenario::SignupAndCheckout, Scenario::SignupAndLogin],
            )
            .await;

        assert!(!report.all_passed());
        assert_eq!(report.total(), 1);
        assert_eq!(report.skipped, vec!["signup_and_login".to_string()]);
        let failure = &report.results[0];
        assert_eq!(failure.name, "signup_and_checkout");
        assert!(failure
            .error
            .as_deref()
            .unwrap()
            .contains("confirm_order postcondition failed"));
        assert!(failure
            .url
            .as_deref()
            .unwrap()
            .contains("checkout/completed/"));
        let shot = failure.screenshot.as_ref().unwrap();
        assert!(shot.starts_with(dir.path()));
        assert!(shot.exists());
    }

    #[tokio::test]
    async fn test_failure_without_screenshots_keeps_going() {
        let dir = TempDir::new().unwrap();
        let shop = FakeShop::new().with_completion_title("Something went wrong");
        let session = shop.session(dir.path());

        let report = ScenarioRunner::new()
            .with_screenshots(false)
            .with_seed(Some(8))
            .run(
                &session,
                &[Scenario::SignupAndCheckout, Scenario::SignupAndLogin],
            )
            .await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.passed_count(), 1);
        assert!(report.skipped.is_empty());
        assert!(report.results[0].screenshot.is_none());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
