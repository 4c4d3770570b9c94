//! Fake-backed application wiring for handler tests.

use std::sync::Arc;

use actix_web::{test, web, App};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::TokenService;
use crate::domain::services::fakes::{
    FakeBootcampRepo, FakeCourseRepo, FakeGeocoder, FakeMailer, FakePhotoStore, FakeReviewRepo,
    FakeStore, FakeUserRepo,
};
use crate::domain::services::{
    AccountService, BootcampService, CourseService, ReviewService, UserService,
};
use crate::domain::{
    Bootcamp, Career, Location, RegisterUser, Role, User, DEFAULT_PHOTO,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

const TEST_PASSWORD: &str = "secret1";

/// Fully wired state plus handles on the fakes behind it.
pub struct TestContext {
    pub state: web::Data<HttpState>,
    pub store: Arc<FakeStore>,
    pub mailer: Arc<FakeMailer>,
    pub photos: Arc<FakePhotoStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(FakeStore::default());
        let users = Arc::new(FakeUserRepo::new(store.clone()));
        let bootcamps = Arc::new(FakeBootcampRepo::new(store.clone()));
        let courses = Arc::new(FakeCourseRepo::new(store.clone()));
        let reviews = Arc::new(FakeReviewRepo::new(store.clone()));
        let mailer = Arc::new(FakeMailer::default());
        let photos = Arc::new(FakePhotoStore::default());

        let state = HttpState {
            account: AccountService::new(
                users.clone(),
                TokenService::new(b"test-secret"),
                mailer.clone(),
                "http://localhost:5000",
            ),
            bootcamps: BootcampService::new(
                bootcamps.clone(),
                Arc::new(FakeGeocoder::at(42.3505, -71.1054)),
                photos.clone(),
                1_000_000,
            ),
            courses: CourseService::new(courses, bootcamps.clone()),
            reviews: ReviewService::new(reviews, bootcamps),
            users: UserService::new(users),
            cookie_secure: false,
        };

        Self {
            state: web::Data::new(state),
            store,
            mailer,
            photos,
        }
    }
}

/// Build the app with every route registered, backed by the context's fakes.
pub async fn spawn_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .configure(configure_api),
    )
    .await
}

async fn register_with_role(ctx: &TestContext, email: &str, role: Role) -> (User, String) {
    let user = ctx
        .state
        .users
        .create(RegisterUser {
            first_name: "Test".into(),
            last_name: None,
            email: email.into(),
            password: TEST_PASSWORD.into(),
            role: Some(role),
        })
        .await
        .expect("test account created");
    let (_, token) = ctx
        .state
        .account
        .login(email, TEST_PASSWORD)
        .await
        .expect("test account logs in");
    (user, token)
}

pub async fn register_user(ctx: &TestContext, email: &str) -> (User, String) {
    register_with_role(ctx, email, Role::User).await
}

pub async fn register_publisher(ctx: &TestContext, email: &str) -> (User, String) {
    register_with_role(ctx, email, Role::Publisher).await
}

pub async fn register_admin(ctx: &TestContext, email: &str) -> (User, String) {
    register_with_role(ctx, email, Role::Admin).await
}

/// Seed a bootcamp owned by `owner` directly into the fake store.
pub fn seed_bootcamp_for(ctx: &TestContext, owner: &User, name: &str) -> Bootcamp {
    let bootcamp = Bootcamp {
        id: Uuid::new_v4(),
        name: name.into(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: "Full stack development".into(),
        website: None,
        phone: None,
        email: None,
        location: Location {
            kind: "Point",
            coordinates: [-71.1054, 42.3505],
            formatted_address: None,
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        },
        careers: vec![Career::WebDevelopment],
        average_rating: None,
        average_cost: None,
        photo: DEFAULT_PHOTO.to_owned(),
        housing: false,
        job_assistance: false,
        job_guarantee: false,
        accept_gi: false,
        user_id: owner.id,
        created_at: Utc::now(),
    };
    ctx.store.seed_bootcamp(bootcamp.clone());
    bootcamp
}
