use std::sync::Mutex;

use rocket::config::{Config, Environment};
use rocket_contrib::templates::handlebars::Handlebars;

use crate::config::CONFIG;
use crate::domain::vocab::Stats;
use crate::error::{VocabError, VocabResult};
use crate::store::VocabularyStore;
use crate::utils::format_count;

/// The store as handed to request handlers. One lock, held for the length of
/// a request, serializes every read and exclusion.
pub type SharedStore = Mutex<VocabularyStore>;

pub fn serve(store: VocabularyStore) -> VocabResult<()> {
    // fail at startup rather than on the first request if a template is broken
    let _hbars = &*TEMPLATES;

    let config = Config::build(Environment::Production)
        .address(CONFIG.address.as_str())
        .port(CONFIG.port)
        .finalize()?;

    info!(
        "Attempting to launch Rocket at http://{}:{} ...",
        CONFIG.address, CONFIG.port
    );

    let why = app(config, store).launch();
    error!("Rocket failed to ignite: {}", why.kind());
    Err(VocabError::Launch(why.kind().to_string()))
}

pub fn app(config: Config, store: VocabularyStore) -> rocket::Rocket {
    rocket::custom(config)
        .manage::<SharedStore>(Mutex::new(store))
        .mount("/", routes![html::index])
        .mount(
            "/",
            routes![api::stats, api::occurrences, api::remove_word],
        )
}

/// Stats as shown to the user, with thousands separators.
#[derive(Debug, Serialize)]
pub struct DisplayStats {
    unique_active_words: String,
    total_active_occurrences: String,
    unique_excluded_words: String,
    total_excluded_occurrences: String,
    exception_list_size: String,
}

impl From<Stats> for DisplayStats {
    fn from(stats: Stats) -> Self {
        DisplayStats {
            unique_active_words: format_count(stats.unique_active_words),
            total_active_occurrences: format_count(stats.total_active_occurrences),
            unique_excluded_words: format_count(stats.unique_excluded_words),
            total_excluded_occurrences: format_count(stats.total_excluded_occurrences),
            exception_list_size: format_count(stats.exception_list_size),
        }
    }
}

mod html {
    use rocket::response::content;
    use rocket::State;

    use super::{DisplayStats, SharedStore, TEMPLATES};
    use crate::error::VocabResult;
    use crate::utils::format_count;

    #[get("/")]
    pub fn index(store: State<'_, SharedStore>) -> VocabResult<content::Html<String>> {
        let store = store.lock()?;

        let words = store
            .sorted_vocabulary()
            .into_iter()
            .map(|wc| {
                json!({
                    "word": wc.word,
                    "count": format_count(wc.count),
                })
            })
            .collect::<Vec<_>>();

        let context = json!({
            "words": words,
            "stats": DisplayStats::from(store.stats()),
        });

        let rendered = TEMPLATES.render("vocabulary", &context)?;
        Ok(content::Html(rendered))
    }
}

mod api {
    use rocket::State;
    use rocket_contrib::json::Json;

    use super::{DisplayStats, SharedStore};
    use crate::domain::vocab::Occurrence;
    use crate::error::VocabResult;

    #[get("/get_stats")]
    pub fn stats(store: State<'_, SharedStore>) -> VocabResult<Json<DisplayStats>> {
        let store = store.lock()?;
        Ok(Json(store.stats().into()))
    }

    #[get("/get_occurrences/<word>")]
    pub fn occurrences(
        word: String,
        store: State<'_, SharedStore>,
    ) -> VocabResult<Json<Vec<Occurrence>>> {
        let store = store.lock()?;
        Ok(Json(store.occurrences_of(&word)))
    }

    #[post("/remove_word/<word>")]
    pub fn remove_word(
        word: String,
        store: State<'_, SharedStore>,
    ) -> VocabResult<Json<DisplayStats>> {
        let mut store = store.lock()?;
        Ok(Json(store.exclude(&word).into()))
    }
}

lazy_static! {
    static ref TEMPLATES: Handlebars = {
        let mut hbars = Handlebars::new();
        let root_template = include_str!("templates/index.html");

        let vocabulary_fragment = include_str!("templates/vocabulary.hbs");
        let vocabulary_template = root_template.replace("{{content}}", vocabulary_fragment);

        hbars.register_template_string("vocabulary", &vocabulary_template)
            .expect("unable to register vocabulary template");

        hbars
    };
}
