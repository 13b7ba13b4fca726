use chrono::{DateTime, Utc};

use crate::common::{
    ApiCommand, ApiEvent, ContentPayload, Document, DocumentVersion, TrustedHtml, VersionChoice,
    VersionSummary,
};

/// Content shown in the viewer together with the metadata of the version it
/// came from.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub html: TrustedHtml,
    pub version_number: i64,
    pub change_summary: Option<String>,
    pub author: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LoadedContent {
    fn from_current(document: &Document) -> Option<Self> {
        Some(Self {
            html: document.body()?,
            version_number: document.current_version,
            change_summary: None,
            author: document
                .updated_by_name
                .clone()
                .or_else(|| document.created_by_name.clone()),
            timestamp: document.updated_at,
        })
    }

    fn from_version(version: &DocumentVersion) -> Option<Self> {
        Some(Self {
            html: version.body()?,
            version_number: version.version_number,
            change_summary: version.change_summary.clone(),
            author: version.created_by_name.clone(),
            timestamp: version.created_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum ContentState {
    #[default]
    Loading,
    Loaded(LoadedContent),
    NotFound,
}

/// State of the document viewer widget.
#[derive(Debug, Default)]
pub struct DocumentViewerState {
    pub document: Option<Document>,
    pub selection: VersionChoice,
    pub content: ContentState,
    /// Newest first.
    pub versions: Vec<VersionSummary>,
    pub show_source: bool,
    requested_version: Option<i64>,
}

impl DocumentViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the viewer on `document`, optionally at a historical version.
    /// Returns the fetches to issue; nothing when the inputs are unchanged.
    pub fn open(&mut self, document: Document, requested_version: Option<i64>) -> Vec<ApiCommand> {
        let unchanged = self.document.as_ref().is_some_and(|current| {
            current.id == document.id && current.current_version == document.current_version
        }) && self.requested_version == requested_version;
        if unchanged {
            return Vec::new();
        }

        let same_document = self
            .document
            .as_ref()
            .is_some_and(|current| current.id == document.id);
        if !same_document {
            self.content = ContentState::Loading;
            self.versions.clear();
            self.show_source = false;
        }

        let document_id = document.id;
        self.selection = match requested_version {
            Some(version) if version != document.current_version => {
                VersionChoice::Historical(version)
            }
            _ => VersionChoice::Current,
        };
        self.requested_version = requested_version;
        self.document = Some(document);

        log::info!(
            "Opening document {document_id} at {:?}",
            self.selection
        );

        vec![
            ApiCommand::FetchContent {
                document_id,
                choice: self.selection,
            },
            ApiCommand::FetchVersions { document_id },
        ]
    }

    /// Mounts a document whose current content was just fetched. When the
    /// current version is shown, that content is used instead of a second
    /// fetch.
    pub fn open_fetched(
        &mut self,
        document: Document,
        requested_version: Option<i64>,
    ) -> Vec<ApiCommand> {
        let mut commands = self.open(document.clone(), requested_version);
        if commands.is_empty() || self.is_historical() {
            return commands;
        }

        commands.retain(|command| !matches!(command, ApiCommand::FetchContent { .. }));
        self.apply(ApiEvent::ContentLoaded {
            document_id: document.id,
            requested: VersionChoice::Current,
            payload: ContentPayload::Current(document),
        });
        commands
    }

    /// The document itself could not be resolved: nothing to mount.
    pub fn show_missing(&mut self, document_id: i64) {
        log::warn!("Document {document_id} not found");
        *self = Self {
            content: ContentState::NotFound,
            ..Self::default()
        };
    }

    /// Selector change. Picking the current version number shows the
    /// current document.
    pub fn select_version(&mut self, version_number: i64) -> Option<ApiCommand> {
        let document = self.document.as_ref()?;
        let choice = if version_number == document.current_version {
            VersionChoice::Current
        } else {
            VersionChoice::Historical(version_number)
        };
        self.selection = choice;

        Some(ApiCommand::FetchContent {
            document_id: document.id,
            choice,
        })
    }

    pub fn select(&mut self, choice: VersionChoice) -> Option<ApiCommand> {
        match choice {
            VersionChoice::Current => {
                let current = self.document.as_ref()?.current_version;
                self.select_version(current)
            }
            VersionChoice::Historical(version_number) => self.select_version(version_number),
        }
    }

    pub fn is_historical(&self) -> bool {
        self.selection.is_historical()
    }

    pub fn current_label(&self) -> String {
        let current = self
            .document
            .as_ref()
            .map(|document| document.current_version)
            .unwrap_or_default();
        format!("Current (v{current})")
    }

    /// Entries for the version selector: current first, then every other
    /// known version, newest first.
    pub fn version_options(&self) -> Vec<(VersionChoice, String)> {
        let current = self
            .document
            .as_ref()
            .map(|document| document.current_version);

        let mut options = vec![(VersionChoice::Current, self.current_label())];
        options.extend(
            self.versions
                .iter()
                .filter(|version| Some(version.version_number) != current)
                .map(|version| {
                    let label = match &version.change_summary {
                        Some(summary) if !summary.is_empty() => {
                            format!("v{} · {summary}", version.version_number)
                        }
                        _ => format!("v{}", version.version_number),
                    };
                    (VersionChoice::Historical(version.version_number), label)
                }),
        );
        options
    }

    /// Applies a network result. Responses are not matched against the
    /// latest request, so a late answer can replace newer content.
    pub fn apply(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::ContentLoaded {
                document_id,
                requested,
                payload,
            } => {
                let loaded = match &payload {
                    ContentPayload::Current(document) => {
                        self.refresh_metadata(document);
                        LoadedContent::from_current(document)
                    }
                    ContentPayload::Historical(version) => LoadedContent::from_version(version),
                    ContentPayload::Missing => None,
                };

                self.content = match loaded {
                    Some(content) => ContentState::Loaded(content),
                    None => {
                        log::warn!("Document {document_id} ({requested:?}) has no content");
                        ContentState::NotFound
                    }
                };
            }
            ApiEvent::VersionsLoaded {
                document_id,
                mut versions,
            } => {
                versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
                log::debug!(
                    "Document {document_id} has {} versions",
                    versions.len()
                );
                self.versions = versions;
            }
            _ => {}
        }
    }

    fn refresh_metadata(&mut self, fetched: &Document) {
        if let Some(document) = self.document.as_mut() {
            if document.id == fetched.id {
                document.file_name = fetched.file_name.clone();
                document.file_type = fetched.file_type;
                document.current_version = fetched.current_version;
                document.created_by_name = fetched.created_by_name.clone();
                document.updated_by_name = fetched.updated_by_name.clone();
                document.updated_at = fetched.updated_at;
            }
        }
    }
}
