//! `KEY=value` file-backed [`TokenStore`], compatible with a dotenv file.
//!
//! `set` rewrites the file with every unrelated line kept in order, drops any previous
//! `ACCESS_TOKEN`/`REFRESH_TOKEN` lines, and appends the new pair. An absent token is written as an
//! empty value.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	store::{StoreError, StoreFuture, TokenStore},
};

const ACCESS_KEY: &str = "ACCESS_TOKEN";
const REFRESH_KEY: &str = "REFRESH_TOKEN";

/// Persists the token pair to a `KEY=value` text file after each write.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<TokenPair>>,
}
impl FileStore {
	/// Opens (or prepares) a store at `path`, loading any pair already written there.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();
		let pair = Self::load_pair(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(pair)) })
	}

	/// File backing this store.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_pair(path: &Path) -> Result<TokenPair, StoreError> {
		if !path.exists() {
			return Ok(TokenPair::default());
		}

		let backend = |e: dotenvy::Error| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		};
		let (mut access, mut refresh) = (None, None);

		for entry in dotenvy::from_path_iter(path).map_err(backend)? {
			let (key, value) = entry.map_err(backend)?;

			match key.as_str() {
				ACCESS_KEY => access = Some(value),
				REFRESH_KEY => refresh = Some(value),
				_ => {},
			}
		}

		Ok(TokenPair::new(access.as_deref(), refresh.as_deref()))
	}

	fn read_lines(path: &Path) -> Result<Vec<String>, StoreError> {
		if !path.exists() {
			return Ok(Vec::new());
		}

		let text = fs::read_to_string(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		Ok(text.lines().map(str::to_owned).collect())
	}

	fn persist_locked(&self, pair: &TokenPair) -> Result<(), StoreError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		let mut contents = String::new();

		for line in Self::read_lines(&self.path)? {
			if entry_key(&line).is_some_and(|key| key == ACCESS_KEY || key == REFRESH_KEY) {
				continue;
			}

			contents.push_str(&line);
			contents.push('\n');
		}

		contents.push_str(&format!("{ACCESS_KEY}={}\n", pair.bearer().unwrap_or_default()));
		contents.push_str(&format!(
			"{REFRESH_KEY}={}\n",
			pair.refresh_token.as_ref().map(|t| t.expose()).unwrap_or_default()
		));

		let mut tmp_path = self.path.clone().into_os_string();

		tmp_path.push(".tmp");

		let tmp_path = PathBuf::from(tmp_path);

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(contents.as_bytes()).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn get(&self) -> StoreFuture<'_, TokenPair> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn set(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			self.persist_locked(&pair)?;
			*guard = pair;

			Ok(())
		})
	}
}

/// Key of a `KEY=value` line, ignoring comments and an optional `export ` prefix.
fn entry_key(line: &str) -> Option<&str> {
	let line = line.trim_start();

	if line.starts_with('#') {
		return None;
	}

	let (key, _) = line.split_once('=')?;

	Some(key.trim().trim_start_matches("export ").trim())
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_path(tag: &str) -> PathBuf {
		let unique = format!(
			"voucher_otp_file_store_{tag}_{}_{}.env",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn entry_keys_skip_comments_and_exports() {
		assert_eq!(entry_key("ACCESS_TOKEN=abc"), Some(ACCESS_KEY));
		assert_eq!(entry_key("export ACCESS_TOKEN=\"abc\""), Some(ACCESS_KEY));
		assert_eq!(entry_key("ACCESS_TOKEN_OLD=abc"), Some("ACCESS_TOKEN_OLD"));
		assert_eq!(entry_key("# ACCESS_TOKEN=abc"), None);
		assert_eq!(entry_key("REFRESH_TOKEN="), Some(REFRESH_KEY));
		assert_eq!(entry_key("not an entry"), None);
	}

	#[tokio::test]
	async fn loading_strips_quotes_and_inline_comments() {
		let path = temp_path("inline");

		fs::write(
			&path,
			"ACCESS_TOKEN=\"abc\" # set by ops\nREFRESH_TOKEN=def # note\nexport OTHER='x'\n",
		)
		.expect("Failed to seed token file fixture.");

		let store = FileStore::open(&path).expect("Failed to open seeded token file.");

		assert_eq!(
			store.get().await.expect("Seeded pair should load."),
			TokenPair::new(Some("abc"), Some("def"))
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}

	#[tokio::test]
	async fn set_preserves_unrelated_lines_and_replaces_tokens() {
		let path = temp_path("preserve");

		fs::write(
			&path,
			"PARTNER_ID=1\nACCESS_TOKEN=old-access\n# comment\nREFRESH_TOKEN=old-refresh\nSMS_API_KEY=k\n",
		)
		.expect("Failed to seed token file fixture.");

		let store = FileStore::open(&path).expect("Failed to open seeded token file.");

		assert_eq!(
			store.get().await.expect("Seeded pair should load."),
			TokenPair::new(Some("old-access"), Some("old-refresh"))
		);

		store
			.set(TokenPair::new(Some("new-access"), None))
			.await
			.expect("Failed to persist new pair.");

		let written = fs::read_to_string(&path).expect("Failed to read token file back.");

		assert_eq!(
			written,
			"PARTNER_ID=1\n# comment\nSMS_API_KEY=k\nACCESS_TOKEN=new-access\nREFRESH_TOKEN=\n"
		);

		let reopened = FileStore::open(&path).expect("Failed to reopen token file.");

		assert_eq!(
			reopened.get().await.expect("Reopened pair should load."),
			TokenPair::new(Some("new-access"), None)
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}

	#[tokio::test]
	async fn missing_file_starts_empty_and_is_created_on_set() {
		let path = temp_path("fresh");
		let store = FileStore::open(&path).expect("Opening a missing file should succeed.");

		assert!(store.get().await.expect("Empty pair should load.").is_empty());

		store.set(TokenPair::new(Some("a"), Some("b"))).await.expect("Failed to persist pair.");

		assert_eq!(
			fs::read_to_string(&path).expect("Token file should now exist."),
			"ACCESS_TOKEN=a\nREFRESH_TOKEN=b\n"
		);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}
}
