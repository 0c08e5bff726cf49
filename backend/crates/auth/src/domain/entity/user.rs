//! User Entity
//!
//! Identity and profile data. Credentials live in [`super::credential`].

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    birth_date::BirthDate, email::Email, full_name::FullName, national_id::NationalId,
    user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned identifier
    pub user_id: UserId,
    pub national_id: NationalId,
    pub email: Email,
    pub full_name: FullName,
    pub birth_date: BirthDate,
    pub is_admin: bool,
    /// `None` until the user accepts the terms of use
    pub terms_accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_accepted_terms(&self) -> bool {
        self.terms_accepted_at.is_some()
    }
}

/// Registration payload; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub national_id: NationalId,
    pub email: Email,
    pub full_name: FullName,
    pub birth_date: BirthDate,
    pub password_hash: UserPassword,
}

/// Independently optional profile changes
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub full_name: Option<FullName>,
    pub email: Option<Email>,
    pub birth_date: Option<BirthDate>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.birth_date.is_none()
    }

    /// Apply to a loaded user, returning whether the name changed
    pub fn apply_to(&self, user: &mut User) -> bool {
        let mut name_changed = false;
        if let Some(name) = &self.full_name {
            name_changed = *name != user.full_name;
            user.full_name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(birth_date) = self.birth_date {
            user.birth_date = birth_date;
        }
        name_changed
    }
}
