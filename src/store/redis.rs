use ::redis::{aio::ConnectionManager, AsyncCommands, Client};

use super::{Error, ListStore};

/// A store backed by a Redis list per key.
///
/// The connection manager reconnects on its own, so a clone is taken per call
/// instead of holding a lock around a single connection.
#[derive(Clone)]
pub struct RedisStore {
	connection: ConnectionManager,
}

impl RedisStore {
	pub async fn connect(url: &str) -> Result<Self, Error> {
		let client = Client::open(url)?;
		let connection = client.get_connection_manager().await?;

		Ok(Self { connection })
	}
}

#[async_trait::async_trait]
impl ListStore for RedisStore {
	async fn read_list(&self, key: &str) -> Result<Vec<String>, Error> {
		let mut connection = self.connection.clone();
		let members: Vec<String> = connection.lrange(key, 0, -1).await?;

		Ok(members)
	}

	/// Deletes the key and pushes every member back in order, in one
	/// `MULTI`/`EXEC` block.
	async fn write_list(&self, key: &str, members: &[String]) -> Result<(), Error> {
		let mut connection = self.connection.clone();
		let mut pipe = ::redis::pipe();

		pipe.atomic().del(key).ignore();

		// RPUSH rejects an empty member list
		if !members.is_empty() {
			pipe.rpush(key, members).ignore();
		}

		let () = pipe.query_async(&mut connection).await?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), Error> {
		let mut connection = self.connection.clone();
		let () = connection.del(key).await?;

		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, Error> {
		let mut connection = self.connection.clone();
		let exists: bool = connection.exists(key).await?;

		Ok(exists)
	}
}
