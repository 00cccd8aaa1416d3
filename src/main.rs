use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{from_fn, Logger},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{connect_database, RedisCache},
    middlewares::{authentication, authorization},
    modules::{
        billing::{repository_pg::BillingRepositoryPg, service::BillingService},
        call::{repository_pg::CallRepositoryPg, service::CallService},
        chat::{repository_pg::ChatRepositoryPg, service::ChatService},
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        poll::{repository_pg::PollRepositoryPg, service::PollService},
        quiz::{repository_pg::QuizRepositoryPg, service::QuizService},
        room::{repository_pg::RoomRepositoryPg, service::RoomService},
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
        whiteboard::{repository_pg::WhiteboardRepositoryPg, service::WhiteboardService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> &'static str {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => "Server is running",
        Err(_) => "Database unreachable",
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = UserRepositoryPg::new(db_pool.clone());
    let friend_repo = FriendRepositoryPg::new(db_pool.clone());
    let chat_repo = ChatRepositoryPg::new(db_pool.clone());
    let call_repo = CallRepositoryPg::new(db_pool.clone());
    let poll_repo = PollRepositoryPg::new(db_pool.clone());
    let quiz_repo = QuizRepositoryPg::new(db_pool.clone());
    let whiteboard_repo = WhiteboardRepositoryPg::new(db_pool.clone());

    let room_repo = Arc::new(RoomRepositoryPg::new(db_pool.clone()));
    let billing_repo = Arc::new(BillingRepositoryPg::new(db_pool.clone()));

    let user_service =
        UserService::with_dependencies(Arc::new(user_repo.clone()), Arc::new(redis_pool));
    let friend_service = FriendService::with_dependencies(
        Arc::new(friend_repo.clone()),
        Arc::new(user_repo.clone()),
    );
    let chat_service = ChatService::with_dependencies(
        Arc::new(chat_repo),
        Arc::new(friend_repo),
        Arc::new(user_repo),
    );
    let room_service = RoomService::with_dependencies(room_repo.clone());
    let call_service = CallService::with_dependencies(Arc::new(call_repo), room_repo.clone());
    let poll_service = PollService::with_dependencies(Arc::new(poll_repo), room_repo.clone());
    let quiz_service =
        QuizService::with_dependencies(Arc::new(quiz_repo), billing_repo.clone());
    let whiteboard_service =
        WhiteboardService::with_dependencies(Arc::new(whiteboard_repo), room_repo);
    let billing_service =
        BillingService::with_dependencies(billing_repo, ENV.payment_provider.clone());

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .app_data(web::Data::new(room_service.clone()))
            .app_data(web::Data::new(call_service.clone()))
            .app_data(web::Data::new(poll_service.clone()))
            .app_data(web::Data::new(quiz_service.clone()))
            .app_data(web::Data::new(whiteboard_service.clone()))
            .app_data(web::Data::new(billing_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .service(
                        web::scope("/admin")
                            .wrap(from_fn(authorization(vec![UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::chat::route::admin_configure)
                            .configure(modules::billing::route::admin_configure),
                    )
                    .service(
                        web::scope("")
                            .wrap(from_fn(authorization(vec![
                                UserRole::User,
                                UserRole::Admin,
                            ])))
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::friend::route::configure)
                            .configure(modules::chat::route::configure)
                            .configure(modules::room::route::configure)
                            .configure(modules::call::route::configure)
                            .configure(modules::poll::route::configure)
                            .configure(modules::quiz::route::configure)
                            .configure(modules::whiteboard::route::configure)
                            .configure(modules::billing::route::configure),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
