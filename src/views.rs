//! HTML pages
//!
//! Small inline builders without a template engine. Every interpolated value
//! goes through [`html_escape`].

use std::collections::HashSet;

use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;

use crate::db::{Group, User, UserSummary};

const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 960px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    nav {
        display: flex;
        justify-content: space-between;
        margin-bottom: 20px;
    }
    nav a { margin-right: 12px; }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 {
        color: #333;
        border-bottom: 2px solid #0066cc;
        padding-bottom: 10px;
    }
    .form-group { margin: 15px 0; }
    label {
        display: block;
        font-weight: bold;
        margin-bottom: 5px;
    }
    input[type="text"],
    input[type="password"] {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        box-sizing: border-box;
    }
    .checkbox label { display: inline; font-weight: normal; }
    button {
        background: #0066cc;
        color: white;
        padding: 10px 20px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
    }
    button.danger { background: #d9534f; }
    table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
    }
    th, td {
        text-align: left;
        padding: 10px;
        border-bottom: 1px solid #ddd;
    }
    .flash {
        color: #a94442;
        background: #f2dede;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    .filters a { margin-right: 8px; }
    .filters a.active { font-weight: bold; }
"#;

pub fn html(page: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// 303 so browsers follow a POST with a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn flash(error: Option<&str>) -> String {
    error.map_or(String::new(), |e| {
        format!(r#"<div class="flash">{}</div>"#, html_escape(e))
    })
}

fn nav(current: Option<&User>) -> String {
    match current {
        Some(user) => format!(
            r#"<nav><div><a href="/users/">Users</a>{create}</div><div>{name} <a href="/auth/logout">Log Out</a></div></nav>"#,
            create = if user.is_admin {
                r#"<a href="/users/create">New user</a>"#
            } else {
                ""
            },
            name = html_escape(&user.username),
        ),
        None => r#"<nav><div><a href="/users/">Users</a></div><div><a href="/auth/register">Register</a> <a href="/auth/login">Log In</a></div></nav>"#.to_string(),
    }
}

fn layout(title: &str, current: Option<&User>, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title} - Users</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    {nav}
    <div class="container">
        <h1>{title}</h1>
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        nav = nav(current),
    )
}

fn text_field(name: &str, label: &str, value: &str, max_length: usize) -> String {
    format!(
        r#"<div class="form-group">
            <label for="{name}">{label}</label>
            <input type="text" id="{name}" name="{name}" value="{value}" maxlength="{max_length}" required>
        </div>"#,
        value = html_escape(value),
    )
}

fn password_field() -> String {
    r#"<div class="form-group">
            <label for="password">Password</label>
            <input type="password" id="password" name="password" required>
        </div>"#
        .to_string()
}

fn checkbox(name: &str, value: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<div class="checkbox">
            <input type="checkbox" id="{name}-{value}" name="{name}" value="{value}"{checked}>
            <label for="{name}-{value}">{label}</label>
        </div>"#,
        value = html_escape(value),
        label = html_escape(label),
        checked = if checked { " checked" } else { "" },
    )
}

pub fn register_page(error: Option<&str>, username: &str, full_name: &str) -> String {
    let content = format!(
        r#"{flash}
        <form method="post" action="/auth/register">
            {username}
            {password}
            {full_name}
            <button type="submit">Register</button>
        </form>"#,
        flash = flash(error),
        username = text_field("username", "Username", username, 150),
        password = password_field(),
        full_name = text_field("full_name", "Full name", full_name, 180),
    );
    layout("Register", None, &content)
}

pub fn login_page(error: Option<&str>, username: &str) -> String {
    let content = format!(
        r#"{flash}
        <form method="post" action="/auth/login">
            {username}
            {password}
            <button type="submit">Log In</button>
        </form>"#,
        flash = flash(error),
        username = text_field("username", "Username", username, 150),
        password = password_field(),
    );
    layout("Log In", None, &content)
}

pub fn user_list_page(
    current: &User,
    users: &[UserSummary],
    groups: &[Group],
    selected: Option<&Group>,
) -> String {
    let mut filters = format!(
        r#"<a href="/users/"{}>All</a>"#,
        if selected.is_none() { r#" class="active""# } else { "" }
    );
    for group in groups {
        let active = selected.is_some_and(|s| s.id == group.id);
        filters.push_str(&format!(
            r#"<a href="/users/?group_id={id}"{class}>{name}</a>"#,
            id = group.id,
            class = if active { r#" class="active""# } else { "" },
            name = html_escape(&group.name),
        ));
    }

    let rows: String = users
        .iter()
        .map(|user| {
            format!(
                r#"<tr><td><a href="/users/{id}">{username}</a></td><td>{full_name}</td><td>{role}</td><td>{joined}</td></tr>"#,
                id = user.id,
                username = html_escape(&user.username),
                full_name = html_escape(&user.full_name),
                role = if user.is_admin { "admin" } else { "user" },
                joined = user.joined_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let body = if users.is_empty() {
        "<p>No users.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>Username</th><th>Full name</th><th>Role</th><th>Joined</th></tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    let title = match selected {
        Some(group) => format!("Users in {}", group.name),
        None => "Users".to_string(),
    };

    let content = format!(r#"<div class="filters">{filters}</div>{body}"#);
    layout(&title, Some(current), &content)
}

pub fn user_detail_page(current: &User, user: &User, groups: &[Group]) -> String {
    let group_items: String = groups
        .iter()
        .map(|g| {
            format!(
                r#"<li><a href="/users/?group_id={}">{}</a></li>"#,
                g.id,
                html_escape(&g.name)
            )
        })
        .collect();
    let group_list = if groups.is_empty() {
        "<p>Not a member of any group.</p>".to_string()
    } else {
        format!("<ul>{group_items}</ul>")
    };

    let actions = if current.is_admin {
        format!(
            r#"<p><a href="/users/{id}/edit">Edit</a></p>
        <form method="post" action="/users/{id}/delete" onsubmit="return confirm('Delete this user?');">
            <button type="submit" class="danger">Delete</button>
        </form>"#,
            id = user.id
        )
    } else {
        String::new()
    };

    let content = format!(
        r#"<p><strong>Username:</strong> {username}</p>
        <p><strong>Full name:</strong> {full_name}</p>
        <p><strong>Role:</strong> {role}</p>
        <p><strong>Joined:</strong> {joined}</p>
        <h2>Groups</h2>
        {group_list}
        {actions}"#,
        username = html_escape(&user.username),
        full_name = html_escape(&user.full_name),
        role = if user.is_admin { "admin" } else { "user" },
        joined = user.joined_at.format("%Y-%m-%d %H:%M"),
    );
    layout(&user.username, Some(current), &content)
}

pub fn user_create_page(
    current: &User,
    error: Option<&str>,
    username: &str,
    full_name: &str,
    is_admin: bool,
) -> String {
    let content = format!(
        r#"{flash}
        <form method="post" action="/users/create">
            {username}
            {password}
            {full_name}
            {admin}
            <button type="submit">Create</button>
        </form>"#,
        flash = flash(error),
        username = text_field("username", "Username", username, 150),
        password = password_field(),
        full_name = text_field("full_name", "Full name", full_name, 180),
        admin = checkbox("is_admin", "on", "Administrator", is_admin),
    );
    layout("New user", Some(current), &content)
}

pub fn user_edit_page(
    current: &User,
    user: &User,
    groups: &[Group],
    selected: &HashSet<i32>,
    error: Option<&str>,
    full_name: &str,
    is_admin: bool,
) -> String {
    let group_boxes: String = groups
        .iter()
        .map(|g| checkbox("group_id", &g.id.to_string(), &g.name, selected.contains(&g.id)))
        .collect();

    let content = format!(
        r#"{flash}
        <form method="post" action="/users/{id}/edit">
            {full_name}
            {admin}
            <h2>Groups</h2>
            {group_boxes}
            <button type="submit">Save</button>
        </form>"#,
        flash = flash(error),
        id = user.id,
        full_name = text_field("full_name", "Full name", full_name, 180),
        admin = checkbox("is_admin", "on", "Administrator", is_admin),
    );
    layout(&format!("Edit {}", user.username), Some(current), &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let content = format!("<p>{}</p>", html_escape(message));
    layout(&title, None, &content)
}
