//! eVatR status messages and their classification.
//!
//! The static table below is always complete and valid. A registry can
//! optionally prefer a snapshot file downloaded from the status-messages
//! endpoint; see [`StatusRegistry::with_overrides`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::error::EvatrError;
use super::wire::{WireStatusMessage, map_status_message};

/// Category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    /// A validation outcome (German: Ergebnis).
    Result,
    /// A failure (German: Fehler).
    Error,
    /// A hint or warning (German: Hinweis).
    Hint,
}

impl StatusCategory {
    /// Map the German label used on the wire. Unknown labels yield `None`.
    pub fn from_wire_label(label: &str) -> Option<Self> {
        match label {
            "Ergebnis" => Some(Self::Result),
            "Fehler" => Some(Self::Error),
            "Hinweis" => Some(Self::Hint),
            _ => None,
        }
    }

    /// The German label used on the wire.
    pub fn wire_label(self) -> &'static str {
        match self {
            Self::Result => "Ergebnis",
            Self::Error => "Fehler",
            Self::Hint => "Hinweis",
        }
    }
}

/// A single status message, e.g. `evatr-0000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Stable identifier (`evatr-` + 4 digits).
    pub status: String,
    /// Category; absent when the source used an unknown label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<StatusCategory>,
    /// Conventional HTTP status equivalent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<u16>,
    /// Offending input field (comma-separated if several).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable German message.
    pub message: String,
}

/// Where the active status table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableSource {
    /// The table compiled into this crate.
    Static,
    /// An external snapshot file.
    File(PathBuf),
}

/// An immutable snapshot of status messages, in source order.
#[derive(Debug, Clone)]
pub struct StatusTable {
    messages: Vec<StatusMessage>,
    index: HashMap<String, usize>,
    source: TableSource,
}

impl StatusTable {
    /// Build a table. A repeated status code replaces the earlier entry
    /// in place, so codes stay unique and order stays stable.
    pub fn from_messages(messages: Vec<StatusMessage>, source: TableSource) -> Self {
        let mut table = Self {
            messages: Vec::with_capacity(messages.len()),
            index: HashMap::with_capacity(messages.len()),
            source,
        };
        for msg in messages {
            match table.index.get(&msg.status) {
                Some(&idx) => table.messages[idx] = msg,
                None => {
                    table.index.insert(msg.status.clone(), table.messages.len());
                    table.messages.push(msg);
                }
            }
        }
        table
    }

    /// Look up a status code.
    pub fn get(&self, code: &str) -> Option<&StatusMessage> {
        self.index.get(code).map(|&idx| &self.messages[idx])
    }

    /// Success: category `Result`, or an HTTP equivalent of 200.
    pub fn is_success(&self, code: &str) -> bool {
        self.get(code).is_some_and(|m| {
            m.category == Some(StatusCategory::Result) || m.http == Some(200)
        })
    }

    /// All messages in table order.
    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` if the table holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Where this table came from.
    pub fn source(&self) -> &TableSource {
        &self.source
    }
}

/// Aggregate counts over the active table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusStatistics {
    /// Number of messages.
    pub total: usize,
    /// Messages per category. Uncategorized messages are not counted here.
    pub by_category: BTreeMap<StatusCategory, usize>,
    /// Messages per HTTP equivalent; messages without one count under `0`.
    pub by_http: BTreeMap<u16, usize>,
    /// Origin of the table.
    pub source: TableSource,
}

/// Settings for loading status messages from a snapshot file.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Files tried in order; the first that exists and parses wins.
    pub candidates: Vec<PathBuf>,
    /// How long a loaded table is served before the files are read again.
    pub ttl: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                PathBuf::from("docs").join(STATUS_FILE_NAME),
                PathBuf::from(STATUS_FILE_NAME),
            ],
            ttl: DEFAULT_TTL,
        }
    }
}

impl RegistryConfig {
    /// Default settings adjusted from the environment.
    ///
    /// Variables:
    /// - `EVATR_STATUS_FILE`: tried before the default candidates
    /// - `EVATR_STATUS_TTL_SECS` (default: 300)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("EVATR_STATUS_FILE") {
            config.candidates.insert(0, PathBuf::from(path));
        }
        if let Some(secs) = std::env::var("EVATR_STATUS_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.ttl = Duration::from_secs(secs);
        }
        config
    }
}

/// File name of the snapshot served by the status-messages endpoint.
pub const STATUS_FILE_NAME: &str = "statusmeldungen.json";

/// Default lifetime of a loaded snapshot.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug)]
struct CachedTable {
    table: Arc<StatusTable>,
    loaded_at: Instant,
}

/// Lookup and classification of status codes.
///
/// Safe to share between threads. A reload swaps the whole table at once;
/// readers see either the old or the new snapshot, never a mix.
#[derive(Debug)]
pub struct StatusRegistry {
    overrides: Option<RegistryConfig>,
    cache: RwLock<Option<CachedTable>>,
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static STATIC_TABLE: LazyLock<Arc<StatusTable>> = LazyLock::new(|| {
    let messages = STATUS_MESSAGES
        .iter()
        .map(|s| StatusMessage {
            status: s.status.into(),
            category: Some(s.category),
            http: Some(s.http),
            field: s.field.map(Into::into),
            message: s.message.into(),
        })
        .collect();
    Arc::new(StatusTable::from_messages(messages, TableSource::Static))
});

static GLOBAL: LazyLock<StatusRegistry> = LazyLock::new(StatusRegistry::new);

impl StatusRegistry {
    /// A registry that always serves the static table.
    pub fn new() -> Self {
        Self {
            overrides: None,
            cache: RwLock::new(None),
        }
    }

    /// A registry that prefers snapshot files, falling back to the static table.
    pub fn with_overrides(config: RegistryConfig) -> Self {
        Self {
            overrides: Some(config),
            cache: RwLock::new(None),
        }
    }

    /// Process-wide registry backed by the static table.
    pub fn global() -> &'static StatusRegistry {
        &GLOBAL
    }

    /// The static table compiled into this crate.
    pub fn static_table() -> Arc<StatusTable> {
        Arc::clone(&STATIC_TABLE)
    }

    /// The active table.
    pub fn table(&self) -> Arc<StatusTable> {
        let Some(config) = &self.overrides else {
            return Self::static_table();
        };

        {
            let guard = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = guard.as_ref() {
                if cached.loaded_at.elapsed() < config.ttl {
                    tracing::debug!(source = ?cached.table.source(), "status table served from cache");
                    return Arc::clone(&cached.table);
                }
            }
        }

        let table = load_first_candidate(&config.candidates)
            .map(Arc::new)
            .unwrap_or_else(Self::static_table);

        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedTable {
            table: Arc::clone(&table),
            loaded_at: Instant::now(),
        });
        table
    }

    /// Drop the cached snapshot; the next read loads again.
    pub fn clear_cache(&self) {
        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Look up a status code.
    pub fn get(&self, code: &str) -> Option<StatusMessage> {
        self.table().get(code).cloned()
    }

    /// Success: category `Result`, or an HTTP equivalent of 200.
    ///
    /// Some hints carry HTTP 200 (e.g. `evatr-2002`, valid but not yet
    /// effective). Those count as success here and as warning in
    /// [`Self::is_warning`].
    pub fn is_success(&self, code: &str) -> bool {
        self.table().is_success(code)
    }

    /// Category `Error`.
    pub fn is_error(&self, code: &str) -> bool {
        self.category_of(code) == Some(StatusCategory::Error)
    }

    /// Category `Hint`.
    pub fn is_warning(&self, code: &str) -> bool {
        self.category_of(code) == Some(StatusCategory::Hint)
    }

    fn category_of(&self, code: &str) -> Option<StatusCategory> {
        self.table().get(code).and_then(|m| m.category)
    }

    /// Messages of one category, in table order.
    pub fn by_category(&self, category: StatusCategory) -> Vec<StatusMessage> {
        self.table()
            .messages()
            .iter()
            .filter(|m| m.category == Some(category))
            .cloned()
            .collect()
    }

    /// Messages with the given HTTP equivalent, in table order.
    pub fn by_http(&self, http: u16) -> Vec<StatusMessage> {
        self.table()
            .messages()
            .iter()
            .filter(|m| m.http == Some(http))
            .cloned()
            .collect()
    }

    /// All known status codes, sorted.
    pub fn status_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .table()
            .messages()
            .iter()
            .map(|m| m.status.clone())
            .collect();
        codes.sort();
        codes
    }

    /// Counts per category and HTTP equivalent.
    pub fn statistics(&self) -> StatusStatistics {
        let table = self.table();
        let mut by_category = BTreeMap::new();
        let mut by_http = BTreeMap::new();
        for msg in table.messages() {
            if let Some(category) = msg.category {
                *by_category.entry(category).or_insert(0) += 1;
            }
            *by_http.entry(msg.http.unwrap_or(0)).or_insert(0) += 1;
        }
        StatusStatistics {
            total: table.len(),
            by_category,
            by_http,
            source: table.source().clone(),
        }
    }
}

fn load_first_candidate(candidates: &[PathBuf]) -> Option<StatusTable> {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_status_file(path) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    count = table.len(),
                    "loaded status messages"
                );
                return Some(table);
            }
            Err(e) => tracing::warn!("{e}"),
        }
    }
    None
}

/// Read a snapshot file: a JSON array of status messages in wire shape
/// (`status`, `kategorie`, `httpcode`, `feld`, `meldung`).
///
/// # Errors
///
/// [`EvatrError::RegistryLoad`] if the file cannot be read or parsed.
pub fn load_status_file(path: &Path) -> Result<StatusTable, EvatrError> {
    let load_err = |reason: String| EvatrError::RegistryLoad {
        path: path.to_path_buf(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    let wire: Vec<WireStatusMessage> =
        serde_json::from_str(&content).map_err(|e| load_err(e.to_string()))?;
    let messages = wire.into_iter().map(map_status_message).collect();
    Ok(StatusTable::from_messages(
        messages,
        TableSource::File(path.to_path_buf()),
    ))
}

struct StaticStatus {
    status: &'static str,
    category: StatusCategory,
    http: u16,
    field: Option<&'static str>,
    message: &'static str,
}

const SERVICE_UNAVAILABLE: &str =
    "Eine Bearbeitung Ihrer Anfrage ist zurzeit nicht möglich. Bitte versuchen Sie es später noch einmal.";

/// Status messages as published by the BZSt.
static STATUS_MESSAGES: &[StaticStatus] = &[
    StaticStatus {
        status: "evatr-0000",
        category: StatusCategory::Result,
        http: 200,
        field: None,
        message: "Die angefragte Ust-IdNr. ist zum Anfragezeitpunkt gültig.",
    },
    StaticStatus {
        status: "evatr-0001",
        category: StatusCategory::Hint,
        http: 400,
        field: Some("datenschutz"),
        message: "Bitte bestätigen Sie den Datenschutzhinweis.",
    },
    StaticStatus {
        status: "evatr-0002",
        category: StatusCategory::Hint,
        http: 400,
        field: Some("angefragteUstid"),
        message: "Mindestens eins der Pflichtfelder ist nicht besetzt.",
    },
    StaticStatus {
        status: "evatr-0003",
        category: StatusCategory::Hint,
        http: 400,
        field: Some("firmenname,ort"),
        message: "Die angefragte Ust-IdNr. ist zum Anfragezeitpunkt gültig. Mindestens eines der Pflichtfelder für eine qualifizierte Bestätigungsanfrage ist nicht besetzt.",
    },
    StaticStatus {
        status: "evatr-0004",
        category: StatusCategory::Error,
        http: 400,
        field: Some("anfragendeUstid"),
        message: "Die anfragende DE Ust-IdNr. ist syntaktisch falsch. Sie passt nicht in das deutsche Erzeugungsschema.",
    },
    StaticStatus {
        status: "evatr-0005",
        category: StatusCategory::Error,
        http: 400,
        field: Some("angefragteUstid"),
        message: "Die angegebene angefragte Ust-IdNr. ist syntaktisch falsch.",
    },
    StaticStatus {
        status: "evatr-0006",
        category: StatusCategory::Hint,
        http: 403,
        field: Some("anfragendeUstid"),
        message: "Die anfragende DE USt-IdNr. ist nicht berechtigt eine DE Ust-IdNr. anzufragen.",
    },
    StaticStatus {
        status: "evatr-0007",
        category: StatusCategory::Hint,
        http: 403,
        field: None,
        message: "Fehlerhafter Aufruf.",
    },
    StaticStatus {
        status: "evatr-0008",
        category: StatusCategory::Hint,
        http: 403,
        field: None,
        message: "Die maximale Anzahl von qualifizierten Bestätigungsabfragen für diese Session wurde erreicht. Bitte starten Sie erneut mit einer einfachen Bestätigungsabfrage.",
    },
    StaticStatus {
        status: "evatr-0011",
        category: StatusCategory::Error,
        http: 503,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-0012",
        category: StatusCategory::Error,
        http: 400,
        field: Some("angefragteUstid"),
        message: "Die angefragte USt-IdNr. ist syntaktisch falsch. Sie passt nicht in das Erzeugungsschema.",
    },
    StaticStatus {
        status: "evatr-0013",
        category: StatusCategory::Error,
        http: 503,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-1001",
        category: StatusCategory::Error,
        http: 503,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-1002",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-1003",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-1004",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-2001",
        category: StatusCategory::Hint,
        http: 404,
        field: Some("angefragteUstid"),
        message: "Die angefragte USt-IdNr. ist zum Anfragezeitpunkt nicht vergeben.",
    },
    StaticStatus {
        status: "evatr-2002",
        category: StatusCategory::Hint,
        http: 200,
        field: Some("angefragteUstid"),
        message: "Die angefragte USt-IdNr. ist zum Anfragezeitpunkt nicht gültig. Sie ist erst gültig ab dem Datum im Feld gueltigAb.",
    },
    StaticStatus {
        status: "evatr-2003",
        category: StatusCategory::Error,
        http: 400,
        field: Some("angefragteUstid"),
        message: "Das angegebene Länderkennzeichen der angefragten USt-IdNr. ist nicht gültig.",
    },
    StaticStatus {
        status: "evatr-2004",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-2005",
        category: StatusCategory::Error,
        http: 404,
        field: Some("anfragendeUstid"),
        message: "Die angegebene eigene DE Ust-IdNr. ist zum Anfragezeitpunkt nicht gültig.",
    },
    StaticStatus {
        status: "evatr-2006",
        category: StatusCategory::Hint,
        http: 200,
        field: Some("angefragteUstid"),
        message: "Die angefragte Ust-IdNr. ist zum Anfragezeitpunkt nicht gültig. Sie war gültig im Zeitraum, der durch die Werte in den Feldern gueltigAb und gueltigBis beschrieben ist.",
    },
    StaticStatus {
        status: "evatr-2007",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: "Bei der Verarbeitung der Daten aus dem angefragten EU-Mitgliedstaat ist ein Fehler aufgetreten. Ihre Anfrage kann deshalb nicht bearbeitet werden.",
    },
    StaticStatus {
        status: "evatr-2008",
        category: StatusCategory::Hint,
        http: 200,
        field: None,
        message: "Die angefragte Ust-IdNr. ist zum Anfragezeitpunkt gültig. Für die qualifizierte Bestätigungsanfrage liegt einer Besonderheit vor. Für Rückfragen wenden Sie sich an das BZSt.",
    },
    StaticStatus {
        status: "evatr-2011",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
    StaticStatus {
        status: "evatr-3011",
        category: StatusCategory::Error,
        http: 500,
        field: None,
        message: SERVICE_UNAVAILABLE,
    },
];
