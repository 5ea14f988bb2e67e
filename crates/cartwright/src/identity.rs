//! Generated customer identities.
//!
//! Every field except the email comes from the caller's RNG, so a seeded
//! run reproduces the same names and addresses. The email carries a v4 UUID
//! so that repeated runs never collide with accounts created earlier on the
//! shared demo storefront.

use crate::pages::Gender;
use crate::workflows::{AddressInput, LoginInput, RegistrationInput};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Brian", "Chloe", "Daniel", "Elena", "Farid", "Grace", "Hugo", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Nikolai", "Olivia", "Pedro", "Quinn", "Rosa", "Samir", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baptiste", "Carvalho", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen",
    "Ivanova", "Jensen", "Kowalski", "Larson", "Moreau", "Nakamura", "Okafor", "Petrov",
];

const COMPANIES: &[&str] = &[
    "Acme Logistics", "Bluefin Labs", "Cedar & Co", "Driftwood Analytics", "Evergreen Supply",
    "Foxglove Media", "Granite Works", "Harbor Freight Partners",
];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Lakeside", "Fairview", "Georgetown", "Ashford", "Millbrook",
];

const STREETS: &[&str] = &[
    "Maple Street", "Oak Avenue", "Harbor Road", "Station Lane", "Mill Court", "Church Street",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org"];

const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// A plausible, unique storefront customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Registration gender radio
    pub gender: Gender,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Unique per generated identity
    pub email: String,
    /// Meets the storefront's six character minimum
    pub password: String,
    /// Adult date of birth
    pub date_of_birth: NaiveDate,
    /// Company name
    pub company: String,
    /// Address city
    pub city: String,
    /// First address line
    pub street_address: String,
    /// Postal code
    pub zip_code: String,
    /// Contact phone
    pub phone_number: String,
}

impl Identity {
    /// Generate an identity from `rng`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gender = if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let first_name = pick(rng, FIRST_NAMES).to_string();
        let last_name = pick(rng, LAST_NAMES).to_string();
        let tag = Uuid::new_v4().simple().to_string();
        let email = format!(
            "{}.{}.{}@{}",
            first_name.to_ascii_lowercase(),
            last_name.to_ascii_lowercase(),
            &tag[..12],
            pick(rng, EMAIL_DOMAINS)
        );
        let password: String = (0..12)
            .map(|_| char::from(PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())]))
            .collect();
        let date_of_birth = NaiveDate::from_ymd_opt(
            rng.gen_range(1950..=2003),
            rng.gen_range(1..=12),
            rng.gen_range(1..=28),
        )
        .unwrap_or_default();

        Self {
            gender,
            first_name,
            last_name,
            email,
            password,
            date_of_birth,
            company: pick(rng, COMPANIES).to_string(),
            city: pick(rng, CITIES).to_string(),
            street_address: format!("{} {}", rng.gen_range(1..=999), pick(rng, STREETS)),
            zip_code: format!("{:05}", rng.gen_range(1000..=99_999)),
            phone_number: format!(
                "+1-{:03}-{:03}-{:04}",
                rng.gen_range(200..=999),
                rng.gen_range(200..=999),
                rng.gen_range(0..=9999)
            ),
        }
    }

    /// Full registration with every optional field filled
    #[must_use]
    pub fn registration(&self) -> RegistrationInput {
        RegistrationInput::new(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
        )
        .with_gender(self.gender)
        .with_date_of_birth(self.date_of_birth)
        .with_company_name(&self.company)
        .with_newsletter(true)
    }

    /// Credentials of this identity
    #[must_use]
    pub fn login(&self) -> LoginInput {
        LoginInput::new(&self.email, &self.password)
    }

    /// Address in `country` using this identity's contact details
    #[must_use]
    pub fn address(&self, country: &str) -> AddressInput {
        AddressInput::new(&self.first_name, &self.last_name, &self.email)
            .with_company(&self.company)
            .with_country(country)
            .with_city(&self.city)
            .with_address1(&self.street_address)
            .with_zip_code(&self.zip_code)
            .with_phone_number(&self.phone_number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_person_different_email() {
        let a = Identity::generate(&mut StdRng::seed_from_u64(7));
        let b = Identity::generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(a.first_name, b.first_name);
        assert_eq!(a.last_name, b.last_name);
        assert_eq!(a.password, b.password);
        assert_eq!(a.date_of_birth, b.date_of_birth);
        assert_ne!(a.email, b.email);
    }

    #[test]
    fn test_fields_are_plausible() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let identity = Identity::generate(&mut rng);
            assert!(identity.email.contains('@'));
            assert_eq!(identity.password.len(), 12);
            assert_eq!(identity.zip_code.len(), 5);
            let year = identity.date_of_birth.year();
            assert!((1950..=2003).contains(&year));
            assert!(identity.date_of_birth.day() <= 28);
        }
    }

    #[test]
    fn test_registration_fills_optionals() {
        let identity = Identity::generate(&mut StdRng::seed_from_u64(1));
        let input = identity.registration();
        assert_eq!(input.password, input.confirm_password);
        assert_eq!(input.gender, Some(identity.gender));
        assert_eq!(input.subscribe_newsletter, Some(true));
        assert_eq!(identity.address("Angola").country, "Angola");
    }
}
