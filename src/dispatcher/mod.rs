use crate::{
    auth::UserRole,
    media_element::MediaElementReference,
    records::RecordStore,
    requester::Requester,
    session::PlaybackSession,
    wasm_bindgen,
};

mod api;
mod core;
mod event_listeners;

pub(crate) use event_listeners::{JsMemoryBlob, MediaObservation, PlaybackTickReason};

/// The `Dispatcher` is the dashboard core exported to the JavaScript-side,
/// providing an API to resolve and play stored service videos, drive their
/// analysis through the backend and export the results.
#[wasm_bindgen]
pub struct Dispatcher {
    /// Pure state of the current playback session: phase, source candidates,
    /// audio settings and position.
    session: PlaybackSession,

    /// Allows to perform actions related to the HTMLMediaElement on the
    /// page, like attaching a source, pausing, seeking etc.
    media_element_ref: MediaElementReference,

    /// Abstraction allowing to perform backend requests, while easily
    /// monitoring requests that are pending.
    requester: Requester,

    /// Stored files and analysis records, as last fetched from the backend.
    records: RecordStore,

    /// Role of the logged-in user, `None` while logged out.
    user: Option<UserRole>,

    /// Name of the file whose record is currently shown in the viewer,
    /// if any.
    selected_file: Option<String>,
}
