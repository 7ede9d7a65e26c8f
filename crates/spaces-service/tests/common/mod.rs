//! Shared fixtures for service tests: an in-memory store and a manual clock

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use spaces_core::entities::{Channel, Space, User};
use spaces_core::{ManualClock, ModerationPolicy, SpaceRole};
use spaces_db::MemoryStore;
use spaces_service::dto::{CreateChannelRequest, CreateSpaceRequest, CreateUserRequest};
use spaces_service::{
    ContentService, MembershipService, QueryService, ServiceContext, ServiceContextBuilder,
    UserService,
};

pub struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(ModerationPolicy::default())
    }

    pub fn with_policy(policy: ModerationPolicy) -> Self {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()));
        let store = Arc::new(MemoryStore::new());
        let ctx = ServiceContextBuilder::new()
            .store(store.clone())
            .clock(clock.clone())
            .moderation(policy)
            .build()
            .unwrap();

        Self { ctx, clock, store }
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(&self.ctx)
    }

    pub fn membership(&self) -> MembershipService<'_> {
        MembershipService::new(&self.ctx)
    }

    pub fn content(&self) -> ContentService<'_> {
        ContentService::new(&self.ctx)
    }

    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(&self.ctx)
    }

    pub async fn user(&self, username: &str) -> User {
        self.users()
            .create_user(CreateUserRequest {
                username: username.to_string(),
                display_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn space(&self, owner: &User, name: &str) -> Space {
        self.content()
            .create_space(
                owner.id,
                CreateSpaceRequest {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn channel(&self, space: &Space, name: &str) -> Channel {
        self.content()
            .create_channel(space.id, CreateChannelRequest { name: name.to_string() })
            .await
            .unwrap()
    }

    /// S1 owned by `owner`, channel C1, and U1 admitted to both
    pub async fn scenario(&self) -> Scenario {
        let owner = self.user("owner").await;
        let u1 = self.user("u1").await;
        let space = self.space(&owner, "S1").await;
        let channel = self.channel(&space, "C1").await;

        self.membership()
            .add_space_member(space.id, u1.id, SpaceRole::Member)
            .await
            .unwrap();
        self.membership().add_channel_member(channel.id, u1.id).await.unwrap();

        Scenario { owner, u1, space, channel }
    }
}

pub struct Scenario {
    pub owner: User,
    pub u1: User,
    pub space: Space,
    pub channel: Channel,
}
