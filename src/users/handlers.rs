use std::collections::HashSet;

use actix_web::{web, HttpResponse};
use tracing::{info, warn};

use crate::auth::{AdminRequired, LoginRequired};
use crate::db::{User, UserUpdate};
use crate::error::{AppError, DatabaseError};
use crate::users::forms::{CreateUserForm, EditUserForm, UserListQuery};
use crate::{validation, views, AppState};

async fn fetch_user(state: &AppState, id: i32) -> Result<User, AppError> {
    state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
}

pub async fn get_user_list(
    LoginRequired(current): LoginRequired,
    query: web::Query<UserListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let group_id = match query.group_id.as_deref() {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("invalid group_id: {}", raw)))?,
        ),
        None => None,
    };

    let groups = state.db.list_groups().await?;

    let (users, selected) = match group_id {
        Some(id) => {
            let group = groups
                .iter()
                .find(|g| g.id == id)
                .ok_or_else(|| AppError::NotFound(format!("group {}", id)))?;
            (state.db.list_users_in_group(id).await?, Some(group))
        }
        None => (state.db.list_users().await?, None),
    };

    Ok(views::html(views::user_list_page(&current, &users, &groups, selected)))
}

pub async fn create_user_form(AdminRequired(current): AdminRequired) -> HttpResponse {
    views::html(views::user_create_page(&current, None, "", "", false))
}

pub async fn create_user_item(
    AdminRequired(current): AdminRequired,
    form: web::Form<CreateUserForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let rerender = |message: &str| {
        views::html(views::user_create_page(
            &current,
            Some(message),
            &form.username,
            &form.full_name,
            form.is_admin(),
        ))
    };

    if let Err(message) = validation::validate_new_user(&form.username, &form.password, &form.full_name) {
        return Ok(rerender(message));
    }

    match state
        .auth_service
        .register(&form.username, &form.password, &form.full_name, form.is_admin())
        .await
    {
        Ok(user) => {
            info!("Admin {} created user {}", current.username, user.username);
            Ok(views::redirect(&format!("/users/{}", user.id)))
        }
        Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
            Ok(rerender(&format!("User {} is already registered.", form.username)))
        }
        Err(e) => Err(e),
    }
}

pub async fn get_user_item(
    LoginRequired(current): LoginRequired,
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let groups = state.db.get_groups_for_user(user.id).await?;

    Ok(views::html(views::user_detail_page(&current, &user, &groups)))
}

pub async fn edit_user_form(
    AdminRequired(current): AdminRequired,
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let groups = state.db.list_groups().await?;
    let selected: HashSet<i32> = state
        .db
        .get_groups_for_user(user.id)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();

    Ok(views::html(views::user_edit_page(
        &current,
        &user,
        &groups,
        &selected,
        None,
        &user.full_name,
        user.is_admin,
    )))
}

pub async fn edit_user_item(
    AdminRequired(current): AdminRequired,
    path: web::Path<i32>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = fetch_user(&state, path.into_inner()).await?;
    let form = EditUserForm::parse(&body);

    let groups = state.db.list_groups().await?;
    let existing: HashSet<i32> = groups.iter().map(|g| g.id).collect();

    let validated = validation::validate_full_name(&form.full_name)
        .and_then(|()| validation::parse_group_selection(&form.group_ids, &existing));

    let group_ids = match validated {
        Ok(group_ids) => group_ids,
        Err(message) => {
            warn!("Rejected edit of user {}: {}", user.id, message);
            let selected: HashSet<i32> = form.group_ids.iter().filter_map(|v| v.parse().ok()).collect();
            return Ok(views::html(views::user_edit_page(
                &current,
                &user,
                &groups,
                &selected,
                Some(message),
                &form.full_name,
                form.is_admin,
            )));
        }
    };

    let update = UserUpdate {
        full_name: form.full_name,
        is_admin: form.is_admin,
        group_ids,
    };
    state.db.update_user_with_groups(user.id, &update).await?;
    info!("Admin {} edited user {}", current.username, user.username);

    Ok(views::redirect(&format!("/users/{}", user.id)))
}

pub async fn delete_user_item(
    AdminRequired(current): AdminRequired,
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    state.db.delete_user(id).await?;
    info!("Admin {} deleted user {}", current.username, id);

    Ok(views::redirect("/"))
}
