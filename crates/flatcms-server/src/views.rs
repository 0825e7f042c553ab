//! HTML pages.
//!
//! Every page shares one layout with the pending flash message on top.
//! All interpolated text goes through [`escape`]; document names placed in
//! URLs go through [`doc_path`] first.

use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Bytes that cannot appear raw in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// `/docs/<name>`, with the name percent-encoded and HTML-escaped.
pub fn doc_path(name: &str) -> String {
    escape(&format!("/docs/{}", utf8_percent_encode(name, PATH_SEGMENT)))
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape(title)
    );
    if let Some(message) = flash {
        let _ = writeln!(page, "<p class=\"flash\">{}</p>", escape(message));
    }
    page.push_str(body);
    page.push_str("\n</body>\n</html>\n");
    page
}

/// The document listing.
pub fn index(names: &[String], flash: Option<&str>, username: Option<&str>) -> String {
    let mut body = String::from("<ul>\n");
    for name in names {
        let path = doc_path(name);
        let name = escape(name);
        let _ = writeln!(
            body,
            "<li><a href=\"{path}\">{name}</a> \
             <a href=\"{path}/edit\">edit</a>\
             <form class=\"inline\" method=\"post\" action=\"{path}/duplicate\">\
             <button type=\"submit\">duplicate</button></form>\
             <form class=\"inline\" method=\"post\" action=\"{path}/delete\">\
             <button type=\"submit\">delete</button></form></li>"
        );
    }
    body.push_str("</ul>\n<p><a href=\"/new\">New Document</a></p>\n");

    match username {
        Some(user) => {
            let _ = write!(
                body,
                "<form method=\"post\" action=\"/users/signout\">\
                 <p>Signed in as {}. <button type=\"submit\">Sign Out</button></p></form>",
                escape(user)
            );
        }
        None => body.push_str(
            "<p><a href=\"/users/signin\">Sign In</a> or <a href=\"/users/signup\">Sign Up</a></p>",
        ),
    }

    layout("flatcms", flash, &body)
}

pub fn new_document(flash: Option<&str>, name: &str) -> String {
    let body = format!(
        "<form method=\"post\" action=\"/new\">\n\
         <label for=\"name\">Add a new document:</label>\n\
         <input name=\"name\" id=\"name\" value=\"{}\">\n\
         <button type=\"submit\">Create</button>\n</form>",
        escape(name)
    );
    layout("New Document", flash, &body)
}

pub fn edit_document(flash: Option<&str>, name: &str, content: &str) -> String {
    let path = doc_path(name);
    let escaped = escape(name);
    let body = format!(
        "<form method=\"post\" action=\"{path}\">\n\
         <label for=\"content\">Edit content of {escaped}:</label>\n\
         <textarea name=\"content\" id=\"content\" rows=\"20\" cols=\"100\">{}</textarea>\n\
         <button type=\"submit\">Save Changes</button>\n</form>",
        escape(content)
    );
    layout(&format!("Edit {name}"), flash, &body)
}

fn credentials_form(action: &str, button: &str, flash: Option<&str>, username: &str) -> String {
    let body = format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label for=\"username\">Username</label>\n\
         <input name=\"username\" id=\"username\" value=\"{}\">\n\
         <label for=\"password\">Password</label>\n\
         <input type=\"password\" name=\"password\" id=\"password\">\n\
         <button type=\"submit\">{button}</button>\n</form>",
        escape(username)
    );
    layout(button, flash, &body)
}

pub fn signin(flash: Option<&str>, username: &str) -> String {
    credentials_form("/users/signin", "Sign In", flash, username)
}

pub fn signup(flash: Option<&str>, username: &str) -> String {
    credentials_form("/users/signup", "Sign Up", flash, username)
}
