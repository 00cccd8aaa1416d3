use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendResponse, RequestDirection},
            repository::FriendRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        FriendService { friend_repo, user_repo }
    }

    pub async fn is_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let friendship = self.friend_repo.find_between(&user_id, &friend_id).await?;
        Ok(matches!(friendship, Some(f) if f.status == FriendshipStatus::Accepted))
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = self.friend_repo.find_friends(&user_id).await?;
        Ok(friends)
    }

    pub async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let removed = self.friend_repo.delete_friendship(&user_id, &friend_id).await?;
        if !removed {
            return Err(error::SystemError::not_found("Friendship not found"));
        }
        Ok(())
    }

    pub async fn send_friend_request(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: Option<String>,
    ) -> Result<FriendshipEntity, error::SystemError> {
        if receiver_id == sender_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        if self.user_repo.find_by_id(&receiver_id).await?.is_none() {
            return Err(error::SystemError::not_found("Receiver user not found"));
        }

        match self.friend_repo.find_between(&sender_id, &receiver_id).await? {
            Some(existing) => match existing.status {
                FriendshipStatus::Accepted => {
                    Err(error::SystemError::bad_request("Users are already friends"))
                }
                FriendshipStatus::Pending => {
                    Err(error::SystemError::bad_request("Friend request already exists"))
                }
                // a rejected request may be re-sent; the old row makes way
                FriendshipStatus::Rejected => {
                    self.friend_repo.delete_request(&existing.id).await?;
                    self.friend_repo.create_request(&sender_id, &receiver_id, &message).await
                }
            },
            None => self.friend_repo.create_request(&sender_id, &receiver_id, &message).await,
        }
    }

    pub async fn accept_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<FriendResponse, error::SystemError> {
        let requester_id = self
            .friend_repo
            .respond_atomic(&request_id, &user_id, FriendshipStatus::Accepted)
            .await?;

        let from_user = self
            .user_repo
            .find_by_id(&requester_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(FriendResponse::from(from_user))
    }

    pub async fn reject_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.friend_repo.respond_atomic(&request_id, &user_id, FriendshipStatus::Rejected).await?;
        Ok(())
    }

    pub async fn cancel_friend_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let request = self
            .friend_repo
            .find_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.requester_id != user_id {
            return Err(error::SystemError::forbidden(
                "You are not allowed to cancel this friend request",
            ));
        }

        if request.status != FriendshipStatus::Pending {
            return Err(error::SystemError::bad_request("Friend request already answered"));
        }

        self.friend_repo.delete_request(&request_id).await?;

        Ok(())
    }

    pub async fn get_friend_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let (incoming, outgoing) = tokio::try_join!(
            self.friend_repo.find_pending_to(&user_id),
            self.friend_repo.find_pending_from(&user_id),
        )?;

        let mut all = Vec::with_capacity(incoming.len() + outgoing.len());
        all.extend(
            incoming
                .into_iter()
                .map(|r| FriendRequestResponse::from_row(r, RequestDirection::Incoming)),
        );
        all.extend(
            outgoing
                .into_iter()
                .map(|r| FriendRequestResponse::from_row(r, RequestDirection::Outgoing)),
        );
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::friend::model::FriendRequestRow;
    use crate::modules::user::model::{InsertUser, UpdateUser};
    use crate::modules::user::schema::{UserEntity, UserRole};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFriendRepo {
        rows: Mutex<Vec<FriendshipEntity>>,
    }

    #[async_trait::async_trait]
    impl FriendRepository for FakeFriendRepo {
        async fn find_between(
            &self,
            a: &Uuid,
            b: &Uuid,
        ) -> Result<Option<FriendshipEntity>, error::SystemError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|f| {
                    (f.requester_id == *a && f.addressee_id == *b)
                        || (f.requester_id == *b && f.addressee_id == *a)
                })
                .cloned())
        }

        async fn find_by_id(
            &self,
            id: &Uuid,
        ) -> Result<Option<FriendshipEntity>, error::SystemError> {
            Ok(self.rows.lock().unwrap().iter().find(|f| f.id == *id).cloned())
        }

        async fn find_friends(
            &self,
            _user_id: &Uuid,
        ) -> Result<Vec<FriendResponse>, error::SystemError> {
            Ok(Vec::new())
        }

        async fn find_pending_to(
            &self,
            _user_id: &Uuid,
        ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
            Ok(Vec::new())
        }

        async fn find_pending_from(
            &self,
            _user_id: &Uuid,
        ) -> Result<Vec<FriendRequestRow>, error::SystemError> {
            Ok(Vec::new())
        }

        async fn create_request(
            &self,
            requester_id: &Uuid,
            addressee_id: &Uuid,
            message: &Option<String>,
        ) -> Result<FriendshipEntity, error::SystemError> {
            let row = FriendshipEntity {
                id: Uuid::now_v7(),
                requester_id: *requester_id,
                addressee_id: *addressee_id,
                status: FriendshipStatus::Pending,
                message: message.clone(),
                created_at: chrono::Utc::now(),
                responded_at: None,
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }

        async fn respond_atomic(
            &self,
            request_id: &Uuid,
            user_id: &Uuid,
            status: FriendshipStatus,
        ) -> Result<Uuid, error::SystemError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|f| f.id == *request_id)
                .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;
            if row.addressee_id != *user_id {
                return Err(error::SystemError::forbidden(
                    "You are not allowed to answer this friend request",
                ));
            }
            if row.status != FriendshipStatus::Pending {
                return Err(error::SystemError::bad_request("Friend request already answered"));
            }
            row.status = status;
            row.responded_at = Some(chrono::Utc::now());
            Ok(row.requester_id)
        }

        async fn delete_friendship(&self, a: &Uuid, b: &Uuid) -> Result<bool, error::SystemError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|f| {
                !(f.status == FriendshipStatus::Accepted
                    && ((f.requester_id == *a && f.addressee_id == *b)
                        || (f.requester_id == *b && f.addressee_id == *a)))
            });
            Ok(rows.len() < before)
        }

        async fn delete_request(&self, id: &Uuid) -> Result<(), error::SystemError> {
            self.rows.lock().unwrap().retain(|f| f.id != *id);
            Ok(())
        }
    }

    struct FakeUserRepo {
        users: Vec<UserEntity>,
    }

    fn user(id: Uuid) -> UserEntity {
        UserEntity {
            id,
            username: format!("user-{id}"),
            email: format!("{id}@example.com"),
            hash_password: String::new(),
            role: UserRole::User,
            display_name: "Some User".into(),
            avatar_url: None,
            bio: None,
            phone: None,
            deleted_at: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[async_trait::async_trait]
    impl UserRepository for FakeUserRepo {
        async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self.users.iter().find(|u| u.id == *id).cloned())
        }

        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(None)
        }

        async fn create(&self, _user: &InsertUser) -> Result<Uuid, error::SystemError> {
            unimplemented!()
        }

        async fn update(
            &self,
            _id: &Uuid,
            _user: &UpdateUser,
        ) -> Result<UserEntity, error::SystemError> {
            unimplemented!()
        }

        async fn delete(&self, _id: &Uuid) -> Result<bool, error::SystemError> {
            unimplemented!()
        }

        async fn search_users(
            &self,
            _query: &str,
            _limit: i32,
        ) -> Result<Vec<UserEntity>, error::SystemError> {
            Ok(Vec::new())
        }
    }

    fn service(
        users: Vec<UserEntity>,
    ) -> FriendService<FakeFriendRepo, FakeUserRepo> {
        FriendService::with_dependencies(
            Arc::new(FakeFriendRepo::default()),
            Arc::new(FakeUserRepo { users }),
        )
    }

    #[tokio::test]
    async fn rejects_self_request() {
        let a = Uuid::now_v7();
        let svc = service(vec![user(a)]);
        let err = svc.send_friend_request(a, a, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_pending_request_is_rejected_in_both_directions() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        svc.send_friend_request(a, b, None).await.unwrap();

        let err = svc.send_friend_request(a, b, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc.send_friend_request(b, a, None).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn accept_flips_status_and_returns_requester() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        let request = svc.send_friend_request(a, b, Some("hi".into())).await.unwrap();
        let accepted = svc.accept_friend_request(b, request.id).await.unwrap();

        assert_eq!(accepted.id, a);
        assert!(svc.is_friend(a, b).await.unwrap());
    }

    #[tokio::test]
    async fn only_addressee_may_accept() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        let request = svc.send_friend_request(a, b, None).await.unwrap();
        let err = svc.accept_friend_request(a, request.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));
    }

    #[tokio::test]
    async fn rejected_request_may_be_resent() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        let request = svc.send_friend_request(a, b, None).await.unwrap();
        svc.reject_friend_request(b, request.id).await.unwrap();

        let again = svc.send_friend_request(a, b, None).await.unwrap();
        assert_eq!(again.status, FriendshipStatus::Pending);
        assert_ne!(again.id, request.id);
    }

    #[tokio::test]
    async fn cancel_is_requester_only_and_pending_only() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        let request = svc.send_friend_request(a, b, None).await.unwrap();
        let err = svc.cancel_friend_request(b, request.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        svc.cancel_friend_request(a, request.id).await.unwrap();
        assert!(!svc.is_friend(a, b).await.unwrap());
    }

    #[tokio::test]
    async fn remove_friend_requires_accepted_row() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let svc = service(vec![user(a), user(b)]);

        let err = svc.remove_friend(a, b).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        let request = svc.send_friend_request(a, b, None).await.unwrap();
        svc.accept_friend_request(b, request.id).await.unwrap();
        svc.remove_friend(b, a).await.unwrap();
        assert!(!svc.is_friend(a, b).await.unwrap());
    }
}
