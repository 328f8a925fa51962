//! Server-rendered HTML pages.
//!
//! Everything interpolated into markup goes through `escape`.

use crate::domain::form::RegistrationForm;
use crate::domain::model::{Category, Pet};

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// "dog" -> "Dog".
pub fn display_category(category: Category) -> String {
    let s = category.as_str();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <nav><a href="/">Pets</a> | <a href="/register">Register a pet</a></nav>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

/// The pet list. An empty slice renders a placeholder message.
pub fn index(pets: &[Pet]) -> String {
    let mut body = String::from("  <h1>Pets</h1>\n");
    if pets.is_empty() {
        body.push_str("  <p>No pets registered yet.</p>\n");
        return layout("Pets", &body);
    }

    body.push_str(
        "  <table>\n    <tr><th>ID</th><th>Category</th><th>Breed</th><th>Price</th><th>Owner</th><th></th></tr>\n",
    );
    for pet in pets {
        body.push_str(&format!(
            "    <tr><td>{id}</td><td>{category}</td><td>{breed}</td><td>{price:.2}</td><td>{owner}</td>\
             <td><a href=\"/update/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></td></tr>\n",
            id = pet.id,
            category = display_category(pet.category),
            breed = escape(pet.breed.as_deref().unwrap_or("")),
            price = pet.price,
            owner = escape(&pet.owner),
        ));
    }
    body.push_str("  </table>\n");
    layout("Pets", &body)
}

/// The registration form, posting to `action`. Values from `form` are pre-filled.
pub fn registration_form(heading: &str, action: &str, form: &RegistrationForm) -> String {
    let selected = form
        .category
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok());

    let mut options = String::new();
    for category in Category::ALL {
        options.push_str(&format!(
            "      <option value=\"{value}\"{sel}>{label}</option>\n",
            value = category.as_str(),
            sel = if selected == Some(category) { " selected" } else { "" },
            label = display_category(category),
        ));
    }

    let value = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));
    let body = format!(
        r#"  <h1>{heading}</h1>
  <form method="post" action="{action}">
    <label for="category">Category* : </label>
    <select id="category" name="category" required>
{options}    </select><br>
    <label for="breed">Breed : </label>
    <input id="breed" name="breed" type="text" maxlength="32" value="{breed}"><br>
    <label for="price">Price* : </label>
    <input id="price" name="price" type="text" required value="{price}"><br>
    <label for="owner">Owner* : </label>
    <input id="owner" name="owner" type="text" maxlength="64" required value="{owner}"><br>
    <input type="submit" value="Submit">
  </form>
"#,
        heading = escape(heading),
        action = escape(action),
        options = options,
        breed = value(&form.breed),
        price = value(&form.price),
        owner = value(&form.owner),
    );
    layout(heading, &body)
}

pub fn not_found(message: &str) -> String {
    let body = format!(
        "  <h1>Not Found</h1>\n  <p>{}</p>\n  <p><a href=\"/\">Back to the list</a></p>\n",
        escape(message)
    );
    layout("Not Found", &body)
}
