use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::RedisCache;
use crate::ENV;

use crate::modules::user::model::{
    SignInModel, SignUpModel, UpdateUser, UpdateUserModel, UserResponse,
};
use crate::modules::user::{model::InsertUser, repository::UserRepository};
use crate::utils::{hash_password, verify_password, Claims, TypeClaims};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        let key = format!("user:{}", id);
        if let Some(cached_user) = self.cache.get::<UserResponse>(&key).await? {
            return Ok(cached_user);
        }
        let user_entity = self.repo.find_by_id(&id).await?;
        if let Some(entity) = user_entity {
            self.cache.set(&key, &UserResponse::from(entity.clone()), 3600).await?;
            Ok(UserResponse::from(entity))
        } else {
            Err(error::SystemError::not_found("User not found"))
        }
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<(), error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let update_user = UpdateUser {
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            phone: user.phone,
        };

        self.repo.update(&id, &update_user).await?;

        let key = format!("user:{}", id);
        self.cache.delete(&key).await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), error::SystemError> {
        let deleted = self.repo.delete(&id).await?;
        if !deleted {
            return Err(error::SystemError::not_found("User not found"));
        }
        self.cache.delete(&format!("user:{}", id)).await?;
        Ok(())
    }

    pub async fn search(
        &self,
        query: &str,
        limit: Option<i32>,
    ) -> Result<Vec<UserResponse>, error::SystemError> {
        let limit = limit.unwrap_or(20).clamp(1, 50);
        let users = self.repo.search_users(query, limit).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<uuid::Uuid, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            display_name: user.display_name,
        };

        let user_id = self.repo.create(&new_user).await?;
        info!("New account {} created", user_id);
        Ok(user_id)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<(String, String), error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        self.issue_token_pair(&user_entity.id, &user_entity.role).await
    }

    pub async fn refresh(
        &self,
        refresh_token: Option<String>,
    ) -> Result<(String, String), error::SystemError> {
        let token = refresh_token
            .ok_or_else(|| error::SystemError::unauthorized("Missing refresh token"))?;

        let claims = Claims::decode(&token, ENV.jwt_secret.as_ref())
            .map_err(|_| error::SystemError::unauthorized("Invalid refresh token"))?;

        if claims._type != Some(TypeClaims::RefreshToken) {
            return Err(error::SystemError::unauthorized("Invalid refresh token"));
        }

        let jti =
            claims.jti.ok_or_else(|| error::SystemError::unauthorized("Invalid refresh token"))?;

        let refresh_key = format!("refresh_token:{jti}");
        let stored: Option<Uuid> = self.cache.get(&refresh_key).await?;
        if stored != Some(claims.sub) {
            return Err(error::SystemError::unauthorized("Refresh token revoked"));
        }

        // rotate: the presented jti is single-use
        self.cache.delete(&refresh_key).await?;

        self.issue_token_pair(&claims.sub, &claims.role).await
    }

    pub async fn sign_out(&self, refresh_token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = refresh_token else {
            return Ok(());
        };

        if let Ok(claims) = Claims::decode(&token, ENV.jwt_secret.as_ref()) {
            if let Some(jti) = claims.jti {
                self.cache.delete(&format!("refresh_token:{jti}")).await?;
            }
        }
        Ok(())
    }

    async fn issue_token_pair(
        &self,
        user_id: &Uuid,
        role: &crate::modules::user::schema::UserRole,
    ) -> Result<(String, String), error::SystemError> {
        let access_token = Claims::new(user_id, role, ENV.access_token_expiration)
            .with_type(TypeClaims::AccessToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let jti = Uuid::now_v7();

        let refresh_token = Claims::new(user_id, role, ENV.refresh_token_expiration)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(ENV.jwt_secret.as_ref())?;

        let refresh_key = format!("refresh_token:{jti}");
        self.cache.set(&refresh_key, user_id, ENV.refresh_token_expiration as usize).await?;

        Ok((access_token, refresh_token))
    }
}
