use crate::Db;
use crate::DbResultExt;
use profile_core::error::{ProfileError, ProfileResult};
use profile_core::profile::repo::{ProfileRecord, ProfileRepo, ProfileUpdate};
use profile_core::ProfileId;

use async_trait::async_trait;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    profile_id: i64,
    username: String,
    email: String,
    age: Option<i64>,
    gender: Option<String>,
    height: Option<i64>,
    about_me: Option<String>,
    profile_image: String,
}

impl From<ProfileRow> for ProfileRecord {
    fn from(row: ProfileRow) -> Self {
        ProfileRecord {
            id: ProfileId(row.profile_id),
            username: row.username,
            email: row.email,
            age: row.age,
            gender: row.gender,
            height: row.height,
            about_me: row.about_me,
            profile_image_name: row.profile_image,
        }
    }
}

#[async_trait]
impl ProfileRepo for Db {
    async fn find_first_profile(&self) -> ProfileResult<Option<ProfileRecord>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, username, email, age, gender, height, about_me, profile_image
            FROM profile
            ORDER BY profile_id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn find_profile_by_id(&self, id: ProfileId) -> ProfileResult<Option<ProfileRecord>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, username, email, age, gender, height, about_me, profile_image
            FROM profile
            WHERE profile_id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRecord::from))
    }

    async fn insert_profile_if_empty(
        &self,
        username: &str,
        email: &str,
    ) -> ProfileResult<ProfileRecord> {
        let mut tx = self.pool.begin().await?;

        // A single statement, so two first visits cannot both insert.
        let inserted = sqlx::query(
            r#"
            INSERT INTO profile (username, email)
            SELECT ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM profile)
            "#,
        )
        .bind(username)
        .bind(email)
        .execute(&mut *tx)
        .await
        .on_unique_violation("email", |_| ProfileError::EmailTaken)?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, username, email, age, gender, height, about_me, profile_image
            FROM profile
            ORDER BY profile_id
            LIMIT 1
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if inserted.rows_affected() == 0 {
            tracing::debug!("profile store was not empty, nothing inserted");
        }

        Ok(row.into())
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> ProfileResult<Option<ProfileRecord>> {
        let fields = &update.fields;
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profile SET
                username = ?,
                email = ?,
                age = ?,
                gender = ?,
                height = ?,
                about_me = ?,
                profile_image = COALESCE(?, profile_image)
            WHERE profile_id = ?
            RETURNING profile_id, username, email, age, gender, height, about_me, profile_image
            "#,
        )
        .bind(fields.username.as_str())
        .bind(fields.email.as_str())
        .bind(fields.age)
        .bind(fields.gender.as_deref())
        .bind(fields.height)
        .bind(fields.about_me.as_deref())
        .bind(update.profile_image_name.as_deref())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .on_unique_violation("email", |_| ProfileError::EmailTaken)?;

        Ok(row.map(ProfileRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_core::avatar::DEFAULT_AVATAR;
    use profile_core::profile::{self, ProfileFields};

    use assert_matches::*;

    fn test_fields() -> ProfileFields {
        ProfileFields {
            username: "username".to_string(),
            email: "email@example.com".to_string(),
            age: Some(30),
            gender: Some("male".to_string()),
            height: Some(180),
            about_me: Some("about me".to_string()),
        }
    }

    async fn count_profiles(db: &Db) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM profile")
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_find_nothing_in_empty_store() {
        let db = Db::in_memory().await.unwrap();

        assert_eq!(None, db.find_first_profile().await.unwrap());
        assert_eq!(None, db.find_profile_by_id(ProfileId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn should_insert_default_profile_once() {
        let db = Db::in_memory().await.unwrap();

        let created = profile::get_or_create_default(&db).await.unwrap();
        assert_eq!(profile::DEFAULT_USERNAME, created.username);
        assert_eq!(profile::DEFAULT_EMAIL, created.email);
        assert_eq!(DEFAULT_AVATAR, created.profile_image_name);
        assert_eq!(None, created.age);

        let fetched = profile::get_or_create_default(&db).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(1, count_profiles(&db).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_visits_should_create_one_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", tmp.path().join("site.db").display());
        let db = Db::init(&url).await.unwrap();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { profile::get_or_create_default(&db).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();

        assert_eq!(1, ids.len());
        assert_eq!(1, count_profiles(&db).await);
    }

    #[tokio::test]
    async fn insert_if_empty_should_not_insert_into_populated_store() {
        let db = Db::in_memory().await.unwrap();
        let first = db.insert_profile_if_empty("first", "first@a.b").await.unwrap();

        let second = db
            .insert_profile_if_empty("second", "second@a.b")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(1, count_profiles(&db).await);
    }

    #[tokio::test]
    async fn should_update_then_fetch_profile() {
        let db = Db::in_memory().await.unwrap();
        let created = profile::get_or_create_default(&db).await.unwrap();

        let updated = db
            .update_profile(
                created.id,
                &ProfileUpdate {
                    fields: test_fields(),
                    profile_image_name: Some("0011223344556677.png".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!("username", updated.username);
        assert_eq!("email@example.com", updated.email);
        assert_eq!(Some(30), updated.age);
        assert_eq!(Some("male"), updated.gender.as_deref());
        assert_eq!(Some(180), updated.height);
        assert_eq!(Some("about me"), updated.about_me.as_deref());
        assert_eq!("0011223344556677.png", updated.profile_image_name);

        let fetched = db.find_profile_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated, fetched);
        assert_eq!(Some(updated), db.find_first_profile().await.unwrap());
    }

    #[tokio::test]
    async fn update_should_overwrite_optional_fields_and_keep_image() {
        let db = Db::in_memory().await.unwrap();
        let created = profile::get_or_create_default(&db).await.unwrap();
        db.update_profile(
            created.id,
            &ProfileUpdate {
                fields: test_fields(),
                profile_image_name: Some("0011223344556677.png".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = db
            .update_profile(
                created.id,
                &ProfileUpdate {
                    fields: ProfileFields {
                        username: "other".to_string(),
                        email: "other@example.com".to_string(),
                        ..ProfileFields::default()
                    },
                    profile_image_name: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!("other", updated.username);
        assert_eq!(None, updated.age);
        assert_eq!(None, updated.gender);
        assert_eq!(None, updated.height);
        assert_eq!(None, updated.about_me);
        assert_eq!("0011223344556677.png", updated.profile_image_name);
    }

    #[tokio::test]
    async fn update_of_missing_profile_should_return_none() {
        let db = Db::in_memory().await.unwrap();
        let created = profile::get_or_create_default(&db).await.unwrap();

        let result = db
            .update_profile(
                ProfileId(created.id.0 + 1),
                &ProfileUpdate {
                    fields: test_fields(),
                    profile_image_name: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(None, result);
        assert_eq!(
            created,
            db.find_profile_by_id(created.id).await.unwrap().unwrap()
        );
    }

    #[tokio::test]
    async fn should_fail_to_update_to_taken_email() {
        let db = Db::in_memory().await.unwrap();
        let first = db.insert_profile_if_empty("first", "first@a.b").await.unwrap();
        sqlx::query("INSERT INTO profile (username, email) VALUES ('second', 'second@a.b')")
            .execute(&db.pool)
            .await
            .unwrap();

        let error = db
            .update_profile(
                first.id,
                &ProfileUpdate {
                    fields: ProfileFields {
                        username: "first".to_string(),
                        email: "second@a.b".to_string(),
                        ..ProfileFields::default()
                    },
                    profile_image_name: None,
                },
            )
            .await
            .expect_err("should error");

        assert_matches!(error, ProfileError::EmailTaken);
    }
}
