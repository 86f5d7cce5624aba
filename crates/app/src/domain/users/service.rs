//! Users service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::password::hash_password,
    database::Db,
    domain::users::{
        data::{NewUser, UserInsert},
        errors::UsersServiceError,
        records::UserRecord,
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

fn prepare_insert(user: NewUser) -> Result<UserInsert, UsersServiceError> {
    let user = user.validate()?;
    let password_hash = hash_password(&user.password)?;

    Ok(UserInsert {
        uuid: user.uuid,
        full_name: user.full_name,
        email: user.email,
        password_hash,
        role: user.role,
    })
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let insert = prepare_insert(user)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_user(&mut tx, insert).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_user_if_absent(
        &self,
        user: NewUser,
    ) -> Result<Option<UserRecord>, UsersServiceError> {
        let insert = prepare_insert(user)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_user_if_absent(&mut tx, insert).await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create a user, hashing the supplied password.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Create a user unless one with the same email exists; `None` when skipped.
    async fn create_user_if_absent(
        &self,
        user: NewUser,
    ) -> Result<Option<UserRecord>, UsersServiceError>;
}
