//! Mediator wiring
//!
//! Every command and query handler is registered once in [`build_mediator`].
//! Routes never call handlers directly; they go through [`dispatch`], which
//! also folds the handler's own error type into [`AppError`].

use mediator::{AsyncMediator, Request};
use sqlx::PgPool;

pub use mediator::DefaultAsyncMediator;

use crate::error::AppError;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

/// Register `path::handle` for the request type it accepts
macro_rules! handler {
    ($pool:expr, $($path:ident)::+) => {{
        let pool = $pool.clone();
        move |request| {
            let pool = pool.clone();
            async move { crate::features::$($path)::+::handle(pool, request).await }
        }
    }};
}

pub fn build_mediator(pool: PgPool) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Departments
        .add_handler(handler!(pool, departments::commands::create))
        .add_handler(handler!(pool, departments::commands::update))
        .add_handler(handler!(pool, departments::commands::patch))
        .add_handler(handler!(pool, departments::commands::delete))
        .add_handler(handler!(pool, departments::queries::list))
        .add_handler(handler!(pool, departments::queries::get))
        // Shifts
        .add_handler(handler!(pool, shifts::commands::create))
        .add_handler(handler!(pool, shifts::commands::update))
        .add_handler(handler!(pool, shifts::commands::delete))
        .add_handler(handler!(pool, shifts::queries::list))
        .add_handler(handler!(pool, shifts::queries::get))
        // Addresses
        .add_handler(handler!(pool, addresses::commands::create))
        .add_handler(handler!(pool, addresses::commands::update))
        .add_handler(handler!(pool, addresses::commands::patch))
        .add_handler(handler!(pool, addresses::commands::delete))
        .add_handler(handler!(pool, addresses::queries::list))
        .add_handler(handler!(pool, addresses::queries::get))
        .add_handler(handler!(pool, addresses::queries::list_address_types))
        .add_handler(handler!(pool, addresses::queries::list_state_provinces))
        // Employees
        .add_handler(handler!(pool, employees::commands::create))
        .add_handler(handler!(pool, employees::commands::update))
        .add_handler(handler!(pool, employees::commands::patch))
        .add_handler(handler!(pool, employees::commands::delete))
        .add_handler(handler!(pool, employees::commands::hire))
        .add_handler(handler!(pool, employees::commands::terminate))
        .add_handler(handler!(pool, employees::commands::rehire))
        .add_handler(handler!(pool, employees::commands::add_pay_history))
        .add_handler(handler!(pool, employees::commands::add_address))
        .add_handler(handler!(pool, employees::queries::list))
        .add_handler(handler!(pool, employees::queries::get))
        .add_handler(handler!(pool, employees::queries::department_history))
        .add_handler(handler!(pool, employees::queries::pay_history))
        .add_handler(handler!(pool, employees::queries::addresses))
        // Sales persons
        .add_handler(handler!(pool, sales_persons::commands::create))
        .add_handler(handler!(pool, sales_persons::commands::update))
        .add_handler(handler!(pool, sales_persons::commands::delete))
        .add_handler(handler!(pool, sales_persons::queries::list))
        .add_handler(handler!(pool, sales_persons::queries::get))
        .add_handler(handler!(pool, sales_persons::queries::list_territories))
        // Stores
        .add_handler(handler!(pool, stores::commands::create))
        .add_handler(handler!(pool, stores::commands::update))
        .add_handler(handler!(pool, stores::commands::delete))
        .add_handler(handler!(pool, stores::queries::list))
        .add_handler(handler!(pool, stores::queries::get))
        .build()
}

/// Send `request` through the mediator and map both failure layers to [`AppError`]
pub async fn dispatch<Req, Res, E>(mediator: &AppMediator, request: Req) -> Result<Res, AppError>
where
    Req: Request<Result<Res, E>> + Send + 'static,
    Res: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    let mut mediator = mediator.clone();
    let outcome: Result<Res, E> = mediator.send(request).await.map_err(|e| {
        AppError::Internal(format!(
            "No handler registered for {}: {:?}",
            std::any::type_name::<Req>(),
            e
        ))
    })?;
    outcome.map_err(Into::into)
}
