pub mod accounts;
pub mod clients;
pub mod events;
pub mod forecasts;
pub mod labels;
pub mod permissions;
pub mod projects;
pub mod reports;
pub mod resource;
pub mod teams;
pub mod users;
pub mod webhooks;
