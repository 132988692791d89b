use crate::{Effect, Msg, SessionState, SourceKind, SubmissionRequest, ValidationError};

/// Pure update function: applies a message to state and returns any effects.
///
/// While a request is in flight every user command is ignored; an in-flight
/// request is never cancelled.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::LocalArchiveSelected { name, bytes } => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            state.input_mut().set_local_archive(name, bytes);
            state.retain_only(SourceKind::LocalArchive);
            discard_if(state.reset_outcome())
        }
        Msg::RemoteRepoEntered(url) => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            match state.input_mut().set_remote_repo(&url) {
                Ok(()) => {
                    state.retain_only(SourceKind::RemoteRepo);
                    discard_if(state.reset_outcome())
                }
                Err(err) => {
                    state.fail(err.into());
                    Vec::new()
                }
            }
        }
        Msg::TargetLanguageChanged(language) => {
            if !state.is_busy() {
                state.set_target_language(language);
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            let Some(source) = state.input().source().cloned() else {
                state.fail(ValidationError::NoInput.into());
                return (state, Vec::new());
            };
            let request = SubmissionRequest {
                source,
                target_language: state.target_language(),
                is_reprocess: false,
            };
            dispatch(&mut state, request)
        }
        Msg::ReprocessClicked => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            let retained = match state.retained_source() {
                Some(retained) if state.can_reprocess() => retained.source.clone(),
                _ => {
                    state.fail(ValidationError::NothingToReprocess.into());
                    return (state, Vec::new());
                }
            };
            // The currently selected language is sent, not the retained one.
            let request = SubmissionRequest {
                source: retained,
                target_language: state.target_language(),
                is_reprocess: true,
            };
            dispatch(&mut state, request)
        }
        Msg::SubmissionSucceeded { filename, byte_len } => {
            if let Some(request) = state.take_in_flight() {
                state.succeed(request, filename, byte_len);
            }
            Vec::new()
        }
        Msg::SubmissionFailed(err) => {
            if state.take_in_flight().is_some() {
                state.fail(err);
            }
            Vec::new()
        }
        Msg::PreviewExtractionFailed { message } => {
            if state.result().is_some() && !state.is_busy() {
                state.flag_preview_failure(message);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn dispatch(state: &mut SessionState, request: SubmissionRequest) -> Vec<Effect> {
    let mut effects = discard_if(state.begin(&request));
    effects.push(Effect::Dispatch(request));
    effects
}

fn discard_if(had_result: bool) -> Vec<Effect> {
    if had_result {
        vec![Effect::DiscardResult]
    } else {
        Vec::new()
    }
}
