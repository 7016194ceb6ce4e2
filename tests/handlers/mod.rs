mod auth;
mod chat;
mod health;
mod protected;
