use crate::config::UserEntry;

/// The logged-in staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
}

/// Plain credential check against the configured accounts.
pub fn authenticate(users: &[UserEntry], username: &str, password: &str) -> Option<UserProfile> {
    let username = username.trim();
    let user = users
        .iter()
        .find(|u| u.username == username && u.password == password);
    match user {
        Some(u) => {
            log::info!("{} logged in", u.username);
            Some(UserProfile {
                username: u.username.clone(),
                name: u.name.clone(),
            })
        }
        None => {
            log::warn!("failed login for {username:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<UserEntry> {
        vec![UserEntry {
            username: "lucia@example.org".into(),
            password: "s3cret".into(),
            name: "Lucia".into(),
        }]
    }

    #[test]
    fn valid_credentials_log_in() {
        let profile = authenticate(&users(), " lucia@example.org ", "s3cret").unwrap();
        assert_eq!(profile.name, "Lucia");
        assert_eq!(profile.username, "lucia@example.org");
    }

    #[test]
    fn wrong_password_or_user_is_rejected() {
        assert!(authenticate(&users(), "lucia@example.org", "S3CRET").is_none());
        assert!(authenticate(&users(), "someone@example.org", "s3cret").is_none());
        assert!(authenticate(&[], "lucia@example.org", "s3cret").is_none());
    }
}
