use sea_orm::DatabaseConnection;

use super::{
    AdminDao, AdminSessionDao, AuditLogDao, DaoBase, PasswordResetDao, SignupDao, StudentDao,
};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn admin(&self) -> AdminDao {
        DaoBase::new(&self.db)
    }

    pub fn session(&self) -> AdminSessionDao {
        DaoBase::new(&self.db)
    }

    pub fn password_reset(&self) -> PasswordResetDao {
        DaoBase::new(&self.db)
    }

    pub fn student(&self) -> StudentDao {
        DaoBase::new(&self.db)
    }

    pub fn signup(&self) -> SignupDao {
        DaoBase::new(&self.db)
    }

    pub fn audit_log(&self) -> AuditLogDao {
        DaoBase::new(&self.db)
    }
}
