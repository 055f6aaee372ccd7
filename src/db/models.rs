use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ChirpId = u64;

// Timestamps are stored as RFC 3339 UTC with whole seconds.
mod datetime_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deser: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deser)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

mod option_datetime_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => ser.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deser: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deser)?
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// bcrypt hash, never the plaintext
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub is_chirpy_red: bool,
}

/// User as returned to callers, without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: String,
    pub author_id: UserId,
}

/// Refresh token state. The map key in the snapshot is the SHA-256 digest of
/// the token; the plaintext is only ever held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    #[serde(with = "datetime_format")]
    pub issued_at: DateTime<Utc>,
    #[serde(with = "datetime_format")]
    pub expires_at: DateTime<Utc>,
    #[serde(default, with = "option_datetime_format")]
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Active,
    Expired,
    Revoked,
}

impl RefreshTokenRecord {
    /// Revocation wins over expiry; a token is expired from `expires_at` on.
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked_at.is_some() {
            TokenState::Revoked
        } else if now >= self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }
}

/// The complete record set, mirrored to disk on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Incremented once per committed mutation
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub next_user_id: UserId,
    #[serde(default)]
    pub next_chirp_id: ChirpId,
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshTokenRecord>,
}

impl Snapshot {
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    /// Insert a user under the next sequence id. Fails if the email is taken.
    pub fn insert_user(&mut self, email: &str, password_hash: String) -> Option<User> {
        if self.find_user_by_email(email).is_some() {
            return None;
        }
        let id = self.allocate_user_id();
        let user = User {
            id,
            email: email.to_string(),
            password_hash,
            is_chirpy_red: false,
        };
        self.users.insert(id, user.clone());
        Some(user)
    }

    pub fn insert_chirp(&mut self, author_id: UserId, body: String) -> Chirp {
        let id = self.allocate_chirp_id();
        let chirp = Chirp {
            id,
            body,
            author_id,
        };
        self.chirps.insert(id, chirp.clone());
        chirp
    }

    /// Drop every record but keep the sequence counters, so ids handed out
    /// before the wipe are not issued again.
    pub fn cleared(&self) -> Snapshot {
        Snapshot {
            version: self.version + 1,
            next_user_id: self.next_user_id.max(next_key(&self.users)),
            next_chirp_id: self.next_chirp_id.max(next_key(&self.chirps)),
            ..Snapshot::default()
        }
    }

    // Ids come from the persisted counters and never go backwards, so an id
    // freed by a deletion is not handed out again. The floor covers stores
    // written before the counters existed.
    fn allocate_user_id(&mut self) -> UserId {
        let floor = next_key(&self.users);
        let id = self.next_user_id.max(floor);
        self.next_user_id = id + 1;
        id
    }

    fn allocate_chirp_id(&mut self) -> ChirpId {
        let floor = next_key(&self.chirps);
        let id = self.next_chirp_id.max(floor);
        self.next_chirp_id = id + 1;
        id
    }
}

fn next_key<V>(map: &BTreeMap<u64, V>) -> u64 {
    map.keys().next_back().map_or(1, |max| max + 1)
}
