//! User directory backed by the document store.

use std::sync::Mutex;

use stocktake_auth::{NewUser, Role, User, UserProfile};
use stocktake_core::DomainError;

use crate::error::RepositoryError;
use crate::store::{KeyValueStore, StoreError, load_json, save_json};

pub const USERS_KEY: &str = "users";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_NAME: &str = "Administrador";

pub struct UserDirectory<S> {
    store: S,
    write: Mutex<()>,
}

impl<S> UserDirectory<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// Seed the default administrator when the directory is empty.
    ///
    /// Returns `true` if the account was created.
    pub fn initialize(&self, default_admin_password: &str) -> Result<bool, RepositoryError> {
        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;
        if !self.load()?.is_empty() {
            return Ok(false);
        }

        let admin = NewUser {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: default_admin_password.to_string(),
            name: DEFAULT_ADMIN_NAME.to_string(),
            role: Role::Admin,
        }
        .into_user()?;
        save_json(&self.store, USERS_KEY, &vec![admin])?;

        tracing::info!(username = DEFAULT_ADMIN_USERNAME, "default administrator created");
        Ok(true)
    }

    /// The matching user, or `None` for an unknown username or wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        let username = username.trim();
        let user = self
            .load()?
            .into_iter()
            .find(|u| u.username() == username)
            .filter(|u| u.verify_password(password));

        if user.is_none() {
            tracing::warn!(username, "failed login attempt");
        }
        Ok(user)
    }

    pub fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.load()?.iter().map(User::profile).collect())
    }

    pub fn add_user(&self, new_user: NewUser) -> Result<UserProfile, RepositoryError> {
        let user = new_user.into_user()?;

        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;
        let mut users = self.load()?;
        if users.iter().any(|u| u.username() == user.username()) {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                user.username()
            ))
            .into());
        }

        let profile = user.profile();
        users.push(user);
        save_json(&self.store, USERS_KEY, &users)?;

        tracing::info!(username = %profile.username, role = %profile.role, "user added");
        Ok(profile)
    }

    /// Remove a user. The last administrator cannot be removed.
    pub fn delete_user(&self, username: &str) -> Result<(), RepositoryError> {
        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;
        let mut users = self.load()?;

        let Some(pos) = users.iter().position(|u| u.username() == username) else {
            return Err(DomainError::not_found().into());
        };
        let admins = users.iter().filter(|u| u.is_admin()).count();
        if users[pos].is_admin() && admins <= 1 {
            return Err(DomainError::invariant("cannot delete the last administrator").into());
        }

        users.remove(pos);
        save_json(&self.store, USERS_KEY, &users)?;

        tracing::info!(username, "user deleted");
        Ok(())
    }

    fn load(&self) -> Result<Vec<User>, StoreError> {
        Ok(load_json(&self.store, USERS_KEY)?.unwrap_or_default())
    }
}
