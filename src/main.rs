use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use leads_dashboard::{
    config::Config,
    database::{create_pool, run_migrations},
    external::GeoService,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    store::RecordStore,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");
    let settings =
        ReportSettings::from_config(&config.reports).expect("Invalid report configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );
    let geo_service = GeoService::new(&config.geo).expect("Failed to create region API client");

    let store = RecordStore::new(pool.clone());
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone(), store.clone());
    let prospect_service = ProspectService::new(pool.clone(), store.clone(), settings);
    let reference_service = ReferenceService::new(pool.clone(), store.clone());
    let report_service = ReportService::new(store.clone(), settings);

    if let Err(e) = auth_service
        .ensure_bootstrap_admin(config.bootstrap_admin.as_ref())
        .await
    {
        log::error!("Failed to create bootstrap admin: {e:?}");
    }

    // Serve an empty snapshot rather than refusing to start
    if let Err(e) = store.refresh().await {
        log::error!("Initial data load failed: {e:?}");
    }

    tasks::spawn_all(store.clone(), config.reports.refresh_interval_secs);

    log::info!(
        "Starting HTTP server at {}:{} (report timezone {})",
        config.server.host,
        config.server.port,
        config.reports.timezone
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(prospect_service.clone()))
            .app_data(web::Data::new(reference_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(geo_service.clone()))
            .configure(swagger_config)
            .configure(handlers::health_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::prospect_config)
                    .configure(handlers::reference_config)
                    .configure(handlers::report_config)
                    .configure(handlers::geo_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
