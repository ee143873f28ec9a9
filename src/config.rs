use std::net::IpAddr;

use chrono::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} is not valid: {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	pub session_secret: String,
	/// When absent, entries are kept in memory and lost on restart.
	pub redis_url: Option<String>,
	pub guestbook_key: String,
	pub admin: String,
	pub rate_limit: Duration,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

		let rate_limit: i64 = parse(&var, "GUESTBOOK_RATE_LIMIT_SECS", 300)?;

		if rate_limit < 0 {
			return Err(Error::Invalid {
				name: "GUESTBOOK_RATE_LIMIT_SECS",
				value: rate_limit.to_string(),
			});
		}

		Ok(Self {
			host: parse(&var, "HOST", IpAddr::from([127, 0, 0, 1]))?,
			port: parse(&var, "PORT", 3000)?,
			session_secret: var("SESSION_SECRET").ok_or(Error::Missing("SESSION_SECRET"))?,
			redis_url: var("REDIS_URL"),
			guestbook_key: var("GUESTBOOK_KEY").unwrap_or_else(|| "guestbook".into()),
			admin: var("GUESTBOOK_ADMIN").unwrap_or_else(|| "MannuVilasara".into()),
			rate_limit: Duration::seconds(rate_limit),
		})
	}
}

fn parse<T: std::str::FromStr>(
	var: impl Fn(&str) -> Option<String>,
	name: &'static str,
	default: T,
) -> Result<T, Error> {
	match var(name) {
		Some(value) => value.parse().map_err(|_| Error::Invalid { name, value }),
		None => Ok(default),
	}
}
