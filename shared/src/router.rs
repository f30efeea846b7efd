use crate::error::ApiError;
use crate::responses::json_response;
use crate::types::Message;
use crate::{items, users, AppState};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// A matched endpoint with its decoded path parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Hello,
    ListUsers,
    CreateUser,
    GetUser(Cow<'a, str>),
    UpdateUser(Cow<'a, str>),
    DeleteUser(Cow<'a, str>),
    ListItems,
    CreateItem,
    GetItem(Cow<'a, str>),
    PatchItem(Cow<'a, str>),
    UpdateItem(Cow<'a, str>),
}

impl<'a> Route<'a> {
    /// Match method + path. A trailing slash is ignored. Ids are
    /// percent-decoded; an empty id or one that is not UTF-8 never matches.
    pub fn resolve(method: &Method, path: &'a str) -> Option<Self> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let segments: Vec<&'a str> = trimmed.split('/').skip(1).collect();

        let route = match (method, segments.as_slice()) {
            (&Method::GET, ["hello"]) => Route::Hello,
            (&Method::GET, ["users"]) => Route::ListUsers,
            (&Method::POST, ["users"]) => Route::CreateUser,
            (&Method::GET, ["items"]) => Route::ListItems,
            (&Method::POST, ["items"]) => Route::CreateItem,
            (_, ["users", raw]) => {
                let id = decode_id(*raw)?;
                match method {
                    &Method::GET => Route::GetUser(id),
                    &Method::PUT => Route::UpdateUser(id),
                    &Method::DELETE => Route::DeleteUser(id),
                    _ => return None,
                }
            }
            (_, ["items", raw]) => {
                let id = decode_id(*raw)?;
                match method {
                    &Method::GET => Route::GetItem(id),
                    &Method::PATCH => Route::PatchItem(id),
                    &Method::PUT => Route::UpdateItem(id),
                    _ => return None,
                }
            }
            _ => return None,
        };
        Some(route)
    }
}

fn decode_id(raw: &str) -> Option<Cow<'_, str>> {
    let id = percent_decode_str(raw).decode_utf8().ok()?;
    if id.is_empty() {
        return None;
    }
    Some(id)
}

/// Route one request to its handler
pub async fn dispatch(event: &Request, state: &AppState) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();

    let Some(route) = Route::resolve(method, path) else {
        tracing::info!("No route for {} {}", method, path);
        return ApiError::RouteNotFound.into_response();
    };

    match route {
        Route::Hello => json_response(
            StatusCode::OK,
            &Message {
                message: "The service is running.",
            },
        ),
        Route::ListUsers => users::list_users(state).await,
        Route::CreateUser => users::create_user(state, body).await,
        Route::GetUser(user_id) => users::get_user(state, &user_id).await,
        Route::UpdateUser(user_id) => users::update_user(state, &user_id, body).await,
        Route::DeleteUser(user_id) => users::delete_user(state, &user_id).await,
        Route::ListItems => items::list_items(state).await,
        Route::CreateItem => items::create_item(state, body).await,
        Route::GetItem(item_id) => items::get_item(state, &item_id).await,
        Route::PatchItem(item_id) => items::patch_item(state, &item_id, body).await,
        Route::UpdateItem(item_id) => items::update_item(state, &item_id, body).await,
    }
}
