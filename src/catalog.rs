//! Word catalog and impostor hint pool
//!
//! This module holds the static table of secret words the game draws from,
//! grouped by category, along with an optional pool of clues that impostors
//! may receive for specific words. Both structures are loaded once at
//! startup and never mutated afterwards.

use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};

/// A named group of secret words
///
/// Categories are immutable once loaded. Validation guarantees that the
/// name is non-empty and that the category carries at least one word.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Category {
    /// Display name of the category
    #[garde(length(min = 1))]
    pub name: String,
    /// The secret words belonging to this category
    #[garde(length(min = 1), inner(length(min = 1)))]
    pub words: Vec<String>,
}

/// The static table of categories the game draws secrets from
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WordCatalog {
    /// All available categories
    #[garde(length(min = 1), dive)]
    categories: Vec<Category>,
}

impl WordCatalog {
    /// Creates a catalog from category definitions after validating them
    ///
    /// # Errors
    ///
    /// Returns a `garde::Report` if the catalog is empty, a category name
    /// is empty, or any category carries no words.
    pub fn new(categories: Vec<Category>) -> Result<Self, garde::Report> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Returns all categories in the catalog
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Draws a category and a word from it, both uniformly at random
    ///
    /// # Returns
    ///
    /// A `(category name, word)` pair.
    pub fn draw(&self) -> (&str, &str) {
        let category =
            fastrand::choice(&self.categories).expect("validated catalog is never empty");
        let word =
            fastrand::choice(&category.words).expect("validated category always carries words");
        (category.name.as_str(), word.as_str())
    }

    /// The built-in catalog shipped with the game
    pub fn builtin() -> Self {
        fn category(name: &str, words: &[&str]) -> Category {
            Category {
                name: name.to_owned(),
                words: words.iter().map(|w| (*w).to_owned()).collect(),
            }
        }

        Self {
            categories: vec![
                category(
                    "Comida",
                    &[
                        "Asado",
                        "Milanesa",
                        "Choripán",
                        "Empanadas",
                        "Dulce de Leche",
                        "Locro",
                        "Alfajor de Maicena",
                        "Chipá",
                        "Flan",
                        "Lomito",
                        "Pizza",
                        "Hamburguesa",
                        "Sushi",
                        "Helado",
                        "Picada",
                    ],
                ),
                category(
                    "Lugares",
                    &[
                        "El Obelisco",
                        "La Bombonera",
                        "Mar del Plata",
                        "Bariloche",
                        "Cataratas del Iguazú",
                        "Villa Carlos Paz",
                        "Las Sierras",
                        "Kiosco",
                        "Supermercado chino",
                        "Hospital",
                        "Gimnasio",
                        "Luna",
                        "Escuela",
                        "Terminal de Ómnibus",
                    ],
                ),
                category(
                    "Objetos",
                    &[
                        "Tarjeta Sube",
                        "Termo Stanley",
                        "Parrilla",
                        "Bidet",
                        "Ojotas",
                        "Control Remoto",
                        "Celular",
                        "Conservadora",
                        "Reposera",
                        "Guitarra criolla",
                        "Pelota de fútbol",
                        "Microondas",
                        "Ventilador de pie",
                        "Espejo",
                    ],
                ),
                category(
                    "Personajes",
                    &[
                        "Messi",
                        "Maradona",
                        "El Dibu Martínez",
                        "Susana Giménez",
                        "Ricardo Darín",
                        "Bizarrap",
                        "Lali Espósito",
                        "La Mona Jiménez",
                        "Piñón Fijo",
                        "El Chavo del 8",
                        "Batman",
                        "Papa Noel",
                        "Shrek",
                    ],
                ),
                category(
                    "Animales",
                    &[
                        "Hornero",
                        "Carpincho",
                        "Perro Callejero",
                        "Mosquito",
                        "Vaca",
                        "Paloma",
                        "Cucaracha",
                        "Yaguareté",
                        "Cóndor",
                        "León",
                        "Pingüino",
                        "Dinosaurio",
                        "Unicornio",
                    ],
                ),
                category(
                    "Situaciones",
                    &[
                        "Cacerolazo",
                        "Hacer fila",
                        "Bondi lleno",
                        "Domingo de asado",
                        "La Previa",
                        "Boliche",
                        "Final del Mundial 2022",
                        "Estar sin luz",
                        "Casamiento",
                        "Examen final",
                        "Primera cita",
                        "Entrevista de trabajo",
                        "Película de terror",
                    ],
                ),
                category(
                    "Películas",
                    &[
                        "Titanic",
                        "Harry Potter",
                        "Up",
                        "Toy Story",
                        "Buscando a Nemo",
                        "El Padrino",
                        "Star Wars",
                        "Avatar",
                        "El Rey León",
                        "Jurassic Park",
                        "Matrix",
                    ],
                ),
            ],
        }
    }
}

/// Optional clue pools for impostors, keyed by exact word text
///
/// A missing entry means the word simply has no hint available. That is
/// not an error; impostors for that word receive nothing.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct HintPool {
    /// Candidate clues per word
    clues: HashMap<String, Vec<String>>,
}

impl HintPool {
    /// Creates a hint pool from `(word, clues)` entries
    ///
    /// Entries with an empty clue list are dropped so that every stored
    /// entry is drawable.
    pub fn new<I: IntoIterator<Item = (String, Vec<String>)>>(entries: I) -> Self {
        Self {
            clues: entries
                .into_iter()
                .filter(|(_, pool)| !pool.is_empty())
                .collect(),
        }
    }

    /// Whether the pool has any clues for the given word
    pub fn has_clues(&self, word: &str) -> bool {
        self.clues.contains_key(word)
    }

    /// Draws a clue for the given word uniformly at random
    ///
    /// # Returns
    ///
    /// A clue if the word has a pool entry, otherwise `None`.
    pub fn draw(&self, word: &str) -> Option<&str> {
        self.clues
            .get(word)
            .and_then(|pool| fastrand::choice(pool))
            .map(String::as_str)
    }

    /// The built-in clue pools shipped with the game
    pub fn builtin() -> Self {
        fn entry(word: &str, clues: &[&str]) -> (String, Vec<String>) {
            (
                word.to_owned(),
                clues.iter().map(|c| (*c).to_owned()).collect(),
            )
        }

        Self::new([
            entry("Asado", &["Se come en familia", "Lleva fuego"]),
            entry("Milanesa", &["Va con puré", "Es frita"]),
            entry("Empanadas", &["Se comen con la mano", "Tienen relleno"]),
            entry("Messi", &["Usa camiseta", "Es zurdo"]),
            entry("Maradona", &["Ídolo popular", "Número diez"]),
            entry("La Bombonera", &["Hace ruido", "Es de un club"]),
            entry("Bariloche", &["Hace frío", "Tiene chocolate"]),
            entry("Carpincho", &["Anda en grupo", "Vive cerca del agua"]),
            entry("Mosquito", &["Molesta de noche", "Es chiquito"]),
            entry("Titanic", &["Termina mal", "Hay agua"]),
            entry("Boliche", &["Es de noche", "Hay música"]),
            entry("Celular", &["Está en tu bolsillo", "Tiene pantalla"]),
        ])
    }
}
