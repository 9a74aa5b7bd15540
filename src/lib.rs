//! Summarize YouTube videos and websites with a hosted LLM.
//!
//! The crate loads the text behind a URL (video transcript or page text),
//! sends it to Groq through `rig`, and keeps a per-process history served
//! by a small axum web UI.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(warnings)] // Tous les warnings sont traités comme des erreurs
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![deny(dead_code)] // Le code inutilisé est interdit
#![deny(non_camel_case_types)]
// Les types doivent suivre la convention CamelCase

// Options supplémentaires pour ne rien laisser passer
#![deny(unused_imports)] // Les imports inutilisés sont interdits
#![deny(unused_variables)] // Les variables inutilisés sont interdits
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(non_snake_case)] // Les noms de variables et fonctions doivent être en snake_case
#![deny(non_upper_case_globals)] // Les constantes et globals doivent être en MAJUSCULE
#![deny(nonstandard_style)] // Empêche tout style de code non standard
#![forbid(unsafe_op_in_unsafe_fn)]
// Interdit l'utilisation d'unsafe même dans une fonction unsafe

// Clippy pour stricte discipline
#![deny(clippy::all)] // Active toutes les lints Clippy standard
#![deny(clippy::pedantic)] // Active les lints très strictes de Clippy
#![deny(clippy::nursery)] // Active les lints expérimentales
#![deny(clippy::unwrap_used)] // Interdit unwrap()
#![deny(clippy::expect_used)] // Interdit expect()
#![deny(clippy::panic)] // Interdit panic!()
#![deny(clippy::print_stdout)] // Interdit println!() en production
#![deny(clippy::todo)] // Interdit les TODO dans le code
#![deny(clippy::unimplemented)] // Interdit les fonctions non implémentées
#![deny(clippy::missing_const_for_fn)] // Force const lorsque possible
#![deny(clippy::unwrap_in_result)] // Interdit unwrap() sur Result
#![deny(clippy::module_inception)] // Interdit un module ayant le même nom que le crate
#![deny(clippy::redundant_clone)] // Interdit les clones inutiles
#![deny(clippy::too_many_arguments)] // Limite le nombre d’arguments des fonctions
#![deny(clippy::cognitive_complexity)] // Limite la complexité cognitive des fonctions

// Lints pour sécurité et robustesse
#![deny(overflowing_literals)] // Interdit les littéraux qui débordent

// Les tests peuvent paniquer sur un échec
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Environment-driven configuration.
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod config;
/// URL and credential validation, YouTube short-link normalization.
pub mod input;
/// Document loading from YouTube transcripts and web pages.
#[allow(
    clippy::doc_markdown,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::collapsible_if
)]
pub mod loader;
/// The submit flow tying loader, summarizer and session together.
#[allow(clippy::missing_errors_doc, clippy::significant_drop_tightening)]
pub mod pipeline;
/// HTTP server and API routes.
#[allow(
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::unused_async,
    clippy::significant_drop_tightening,
    clippy::needless_pass_by_value
)]
pub mod server;
/// Session credential and URL history.
pub mod session;
/// Entry helpers to start the server.
pub mod start;
/// Prompting and Groq completion.
#[allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]
pub mod summarize;

pub use config::AppConfig;
pub use pipeline::{Pipeline, PipelineError, SummaryReport};
pub use session::{HistoryEntry, Session};
