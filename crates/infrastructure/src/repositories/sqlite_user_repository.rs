use crate::database::{users, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use domain::{DomainError, User, UserRepository};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

// Database model - separate from the domain entity. The id is stored as
// TEXT since SQLite has no native UUID column.
#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: String,
    name: String,
    email: String,
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|e| DomainError::RepositoryError(format!("invalid stored id: {}", e)))?;
        Ok(User::new(id, model.name, model.email))
    }
}

impl From<&User> for UserModel {
    fn from(user: &User) -> Self {
        UserModel {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

// Mutations staged between save() calls.
#[derive(Debug)]
enum PendingOp {
    Add(User),
    Update(User),
    Remove(User),
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
    pending: Mutex<Vec<PendingOp>>,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn conn(&self) -> Result<r2d2::PooledConnection<ConnectionManager<SqliteConnection>>, DomainError> {
        self.pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))
    }

    fn pending(&self) -> Result<MutexGuard<'_, Vec<PendingOp>>, DomainError> {
        self.pending
            .lock()
            .map_err(|_| DomainError::RepositoryError("staging buffer lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn add(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Add(user));
        Ok(())
    }

    async fn update(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Update(user));
        Ok(())
    }

    async fn remove(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Remove(user));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut conn = self.conn()?;

        let models = users::table
            .select(UserModel::as_select())
            .load::<UserModel>(&mut conn)
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        models.into_iter().map(User::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.conn()?;

        let model = users::table
            .filter(users::id.eq(id.to_string()))
            .select(UserModel::as_select())
            .first::<UserModel>(&mut conn)
            .optional()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        model.map(User::try_from).transpose()
    }

    async fn save(&self) -> Result<usize, DomainError> {
        // Drain first so tracking state is gone even if a statement fails.
        let ops = std::mem::take(&mut *self.pending()?);

        let mut conn = self.conn()?;
        let mut affected = 0;

        for op in ops {
            let rows = match op {
                PendingOp::Add(user) => diesel::insert_into(users::table)
                    .values(UserModel::from(&user))
                    .execute(&mut conn),
                PendingOp::Update(user) => {
                    diesel::update(users::table.filter(users::id.eq(user.id.to_string())))
                        .set((users::name.eq(&user.name), users::email.eq(&user.email)))
                        .execute(&mut conn)
                }
                PendingOp::Remove(user) => {
                    diesel::delete(users::table.filter(users::id.eq(user.id.to_string())))
                        .execute(&mut conn)
                }
            };
            affected += rows.map_err(|e| DomainError::RepositoryError(e.to_string()))?;
        }

        Ok(affected)
    }
}
