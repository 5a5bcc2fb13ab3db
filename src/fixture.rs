//! Generated test subject shared by every step of a scenario
//!
//! A [`Fixture`] is generated once per run and never mutated. Scenario
//! strings reference its values through `{field}` placeholders.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Dennis", "Edsger", "Frances", "Grace", "Hedy", "Ivan",
    "Joan", "John", "Ken", "Linus", "Margaret", "Niklaus", "Radia", "Sophie", "Tim", "Yukihiro",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Cerf", "Dijkstra", "Engelbart", "Floyd", "Goldberg", "Hamilton",
    "Hopper", "Kay", "Knuth", "Lamport", "Liskov", "Lovelace", "McCarthy", "Perlman", "Ritchie",
    "Thompson", "Turing", "Wirth",
];

/// Reserved domains that never deliver mail
const SAFE_EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

const PASSWORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Inclusive password length bounds
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 10;

/// The single generated user a scenario creates, logs in as, fetches and deletes
///
/// Serializes to the pet-store `User` JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl Fixture {
    /// Generate a fixture from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a fixture from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let first_name = pick(rng, FIRST_NAMES).to_string();
        let last_name = pick(rng, LAST_NAMES).to_string();

        let mut username = format!("{}.{}", first_name, last_name).to_lowercase();
        if rng.random_bool(0.5) {
            username.push_str(&rng.random_range(1..1000).to_string());
        }

        let email = format!(
            "{}@{}",
            username.replace('.', "_"),
            pick(rng, SAFE_EMAIL_DOMAINS)
        );

        let password_len = rng.random_range(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN);
        let password = (0..password_len)
            .map(|_| PASSWORD_CHARS[rng.random_range(0..PASSWORD_CHARS.len())] as char)
            .collect();

        let phone = format!(
            "{}-{:03}-{:04}",
            rng.random_range(200..1000),
            rng.random_range(0..1000),
            rng.random_range(0..10_000)
        );

        Self {
            username,
            first_name,
            last_name,
            email,
            password,
            phone,
        }
    }

    /// Look up a fixture value by its JSON field name
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            "firstName" => Some(&self.first_name),
            "lastName" => Some(&self.last_name),
            "email" => Some(&self.email),
            "password" => Some(&self.password),
            "phone" => Some(&self.phone),
            _ => None,
        }
    }

    /// Replace `{field}` placeholders with fixture values
    ///
    /// `{{` and `}}` render literal braces. An unknown field name or an
    /// unterminated placeholder is an error.
    pub fn render(&self, template: &str) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(Error::Config(format!(
                            "Unterminated placeholder in '{}'",
                            template
                        )));
                    }
                    let value = self
                        .field(&name)
                        .ok_or_else(|| Error::UnknownPlaceholder(name.clone()))?;
                    out.push_str(value);
                }
                _ => out.push(c),
            }
        }

        Ok(out)
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    // Lists are non-empty constants
    items.choose(rng).copied().unwrap_or_default()
}
