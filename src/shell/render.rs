use crate::core::SearchView;
use crate::models::DogRecord;

/// One result line, e.g. ` 3. [*] Rex (abc123)  Breed: Poodle | Age: 2 | ZIP: 02139`
pub fn render_dog(position: usize, dog: &DogRecord, favorite: bool) -> String {
    let marker = if favorite { "[*]" } else { "[ ]" };
    format!(
        "{:>2}. {} {} ({})  Breed: {} | Age: {} | ZIP: {}",
        position, marker, dog.name, dog.id, dog.breed, dog.age, dog.zip_code
    )
}

/// The "best match" dialog
pub fn render_match(dog: &DogRecord) -> String {
    format!(
        "== Your Best Match! ==\n{} ({})\nBreed: {} | Age: {} | ZIP: {}\nPhoto: {}\n(type 'close' to dismiss)\n",
        dog.name, dog.id, dog.breed, dog.age, dog.zip_code, dog.img
    )
}

/// Full search surface as text
pub fn render_view(view: &SearchView) -> String {
    let mut out = String::new();

    if view.query.is_active() {
        let zip = if view.query.zip_code.is_empty() {
            "any".to_string()
        } else {
            view.query.zip_code.clone()
        };
        out.push_str(&format!(
            "Results for \"{}\" (ZIP: {})\n",
            view.query.breed, zip
        ));
    } else {
        out.push_str("Enter a breed to start searching.\n");
    }

    if view.loading {
        out.push_str("Loading...\n");
    }
    if let Some(error) = &view.error {
        out.push_str(&format!("{}\n", error));
    }

    for (i, dog) in view.results.dogs.iter().enumerate() {
        out.push_str(&render_dog(i + 1, dog, view.is_favorite(&dog.id)));
        out.push('\n');
    }

    if view.query.is_active() && !view.loading && view.error.is_none() && view.results.is_empty() {
        out.push_str("No dogs found.\n");
    }

    if view.results.shows_pagination() {
        out.push_str(&format!(
            "Page {} of {}\n",
            view.query.page,
            view.results.page_count()
        ));
    }

    out.push_str(&format!("Favorites: {}\n", view.favorites.len()));

    if let Some(dog) = &view.matched {
        out.push_str(&render_match(dog));
    }
    if let Some(alert) = &view.alert {
        out.push_str(&format!("! {}\n", alert));
    }

    out
}
