//! `ProjectDocument`: a generated project stored in an Automerge document.
//!
//! Bulk edits go through [`ProjectDocument::update_state`] (hydrate, mutate,
//! reconcile). Fields that change often after generation (project name,
//! `updated_at`, a shot's base prompt) have targeted setters that write a
//! single value without touching the rest of the document.

use automerge::{
    transaction::Transactable, AutoCommit, ChangeHash, ObjId, ReadDoc, ScalarValue, Value, ROOT,
};
use autosurgeon::{hydrate, reconcile};

use crate::error::{GenError, GenResult};
use crate::project::model::ProjectComponents;

/// Collaborative, mergeable storage for one [`ProjectComponents`].
pub struct ProjectDocument {
    doc: AutoCommit,
    /// Cached hydrated state - invalidated after direct document mutations.
    cached_state: Option<ProjectComponents>,
}

impl ProjectDocument {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a document holding an empty project.
    pub fn new() -> Self {
        let mut doc = AutoCommit::new();
        let root = ProjectComponents::default();
        reconcile(&mut doc, &root).expect("Failed to initialize document");
        Self {
            doc,
            cached_state: Some(root),
        }
    }

    /// Creates a document holding `components`.
    pub fn from_components(components: &ProjectComponents) -> GenResult<Self> {
        let mut doc = AutoCommit::new();
        reconcile(&mut doc, components)?;
        tracing::debug!(project = %components.metadata.id, "Project document created");
        Ok(Self {
            doc,
            cached_state: Some(components.clone()),
        })
    }

    /// Loads a document from saved binary data.
    pub fn from_bytes(bytes: &[u8]) -> GenResult<Self> {
        let doc = AutoCommit::load(bytes)?;
        Ok(Self {
            doc,
            cached_state: None,
        })
    }

    /// Saves the document to binary format.
    pub fn save(&mut self) -> Vec<u8> {
        self.doc.save()
    }

    /// Returns the current heads (for sync protocol).
    pub fn get_heads(&mut self) -> Vec<ChangeHash> {
        self.doc.get_heads()
    }

    /// Gets the actor ID for this document instance.
    pub fn actor_id(&self) -> String {
        self.doc.get_actor().to_hex_string()
    }

    // =========================================================================
    // HIGH-LEVEL OPERATIONS (via Hydrate/Reconcile)
    // =========================================================================

    /// Hydrates the whole project.
    pub fn get_state(&mut self) -> GenResult<ProjectComponents> {
        if let Some(ref cached) = self.cached_state {
            return Ok(cached.clone());
        }
        let state: ProjectComponents = hydrate(&self.doc)?;
        self.cached_state = Some(state.clone());
        Ok(state)
    }

    /// Applies `f` to the project, then reconciles the result back.
    pub fn update_state<F>(&mut self, f: F) -> GenResult<()>
    where
        F: FnOnce(&mut ProjectComponents),
    {
        let mut state = self.get_state()?;
        f(&mut state);
        reconcile(&mut self.doc, &state)?;
        self.cached_state = Some(state);
        Ok(())
    }

    // =========================================================================
    // TARGETED OPERATIONS
    // =========================================================================

    /// Sets `metadata.name` (O(1)).
    pub fn set_project_name(&mut self, name: &str) -> GenResult<()> {
        let metadata = self.get_obj_at_key(&ROOT, "metadata")?;
        self.cached_state = None;
        self.doc
            .put(&metadata, "name", ScalarValue::Str(name.into()))?;
        Ok(())
    }

    /// Sets `metadata.updated_at` in milliseconds since epoch (O(1)).
    pub fn touch_updated_at(&mut self, timestamp: i64) -> GenResult<()> {
        let metadata = self.get_obj_at_key(&ROOT, "metadata")?;
        self.cached_state = None;
        self.doc
            .put(&metadata, "updated_at", ScalarValue::Int(timestamp))?;
        Ok(())
    }

    /// Rewrites the base prompt module of the shot with `shot_id`.
    ///
    /// Generated ids (`shot-{act}-{n}`) resolve straight to their list
    /// position; other ids fall back to scanning the shot lists. Neither
    /// path hydrates the project.
    pub fn set_shot_prompt_base(&mut self, shot_id: &str, base: &str) -> GenResult<()> {
        let shot = self.find_shot(shot_id)?;
        let modules = self.get_obj_at_key(&shot, "prompt_modules")?;

        self.cached_state = None;
        self.doc
            .put(&modules, "base", ScalarValue::Str(base.into()))?;
        Ok(())
    }

    // =========================================================================
    // SYNC OPERATIONS
    // =========================================================================

    /// Merges another document into this one.
    pub fn merge(&mut self, other: &mut Self) -> GenResult<()> {
        self.cached_state = None;
        self.doc.merge(&mut other.doc)?;
        Ok(())
    }

    /// Generates sync message for incremental sync.
    /// Returns None if there are no changes since their_heads.
    pub fn generate_sync_message(&mut self, their_heads: &[ChangeHash]) -> Option<Vec<u8>> {
        let changes = self.doc.get_changes(their_heads);
        if changes.is_empty() {
            return None;
        }
        let mut bytes = Vec::new();
        for change in changes {
            bytes.extend(change.raw_bytes());
        }
        Some(bytes)
    }

    /// Applies sync message from peer.
    pub fn apply_sync_message(&mut self, msg: &[u8]) -> GenResult<()> {
        self.cached_state = None;
        self.doc.load_incremental(msg)?;
        Ok(())
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    /// Object id of the shot whose `id` field equals `shot_id`.
    fn find_shot(&self, shot_id: &str) -> GenResult<ObjId> {
        let plan = self.get_obj_at_key(&ROOT, "sequence_plan")?;
        let sequences = self.get_obj_at_key(&plan, "sequences")?;

        if let Some((sequence_index, shot_index)) = parse_shot_id(shot_id) {
            if let Some(shot) = self.shot_at(&sequences, sequence_index, shot_index)? {
                if self.get_string(&shot, "id")?.as_deref() == Some(shot_id) {
                    return Ok(shot);
                }
            }
        }

        for i in 0..self.doc.length(&sequences) {
            let sequence = self.get_obj_at_index(&sequences, i)?;
            let shots = self.get_obj_at_key(&sequence, "shots")?;
            for j in 0..self.doc.length(&shots) {
                let shot = self.get_obj_at_index(&shots, j)?;
                if self.get_string(&shot, "id")?.as_deref() == Some(shot_id) {
                    return Ok(shot);
                }
            }
        }
        Err(GenError::path_not_found(format!("shot {}", shot_id)))
    }

    fn shot_at(
        &self,
        sequences: &ObjId,
        sequence_index: usize,
        shot_index: usize,
    ) -> GenResult<Option<ObjId>> {
        if sequence_index >= self.doc.length(sequences) {
            return Ok(None);
        }
        let sequence = self.get_obj_at_index(sequences, sequence_index)?;
        let shots = self.get_obj_at_key(&sequence, "shots")?;
        if shot_index >= self.doc.length(&shots) {
            return Ok(None);
        }
        self.get_obj_at_index(&shots, shot_index).map(Some)
    }

    fn get_string(&self, obj: &ObjId, key: &str) -> GenResult<Option<String>> {
        match self.doc.get(obj, key)? {
            Some((Value::Scalar(s), _)) => match s.as_ref() {
                ScalarValue::Str(text) => Ok(Some(text.to_string())),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn get_obj_at_key(&self, parent: &ObjId, key: &str) -> GenResult<ObjId> {
        match self.doc.get(parent, key)? {
            Some((Value::Object(_), obj_id)) => Ok(obj_id),
            Some(_) => Err(GenError::path_not_found(format!("'{}' is not an object", key))),
            None => Err(GenError::path_not_found(key)),
        }
    }

    fn get_obj_at_index(&self, parent: &ObjId, index: usize) -> GenResult<ObjId> {
        match self.doc.get(parent, index)? {
            Some((Value::Object(_), obj_id)) => Ok(obj_id),
            _ => Err(GenError::path_not_found(format!("index {}", index))),
        }
    }
}

/// `shot-{act}-{n}` to zero-based `(sequence, shot)` list indices.
fn parse_shot_id(shot_id: &str) -> Option<(usize, usize)> {
    let (act, number) = shot_id.strip_prefix("shot-")?.split_once('-')?;
    let act: usize = act.parse().ok()?;
    let number: usize = number.parse().ok()?;
    Some((act.checked_sub(1)?, number.checked_sub(1)?))
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ComponentGenerator;
    use crate::project::model::{CharacterBrief, ParsedPrompt};

    fn components() -> ProjectComponents {
        let prompt = ParsedPrompt::new("Harbor Lights", "noir", "short_film", 120)
            .with_mood("bleak")
            .with_setting("the docks")
            .with_confidence("genre", 0.9)
            .with_character(CharacterBrief::new("Sam", "protagonist"))
            .with_character(CharacterBrief::new("Lou", "antagonist"));
        ComponentGenerator::new().generate(&prompt).unwrap()
    }

    #[test]
    fn test_new_document() {
        let mut doc = ProjectDocument::new();
        let state = doc.get_state().unwrap();
        assert!(state.story.acts.is_empty());
        assert!(state.coherence.is_coherent);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let original = components();
        let mut doc = ProjectDocument::from_components(&original).unwrap();
        let bytes = doc.save();

        let mut loaded = ProjectDocument::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.get_state().unwrap(), original);
    }

    #[test]
    fn test_targeted_updates() {
        let mut doc = ProjectDocument::from_components(&components()).unwrap();
        doc.set_project_name("Harbor Lights (cut 2)").unwrap();
        doc.touch_updated_at(1_700_000_000_000).unwrap();
        doc.set_shot_prompt_base("shot-2-3", "close-up shot, rain on the pier")
            .unwrap();

        let state = doc.get_state().unwrap();
        assert_eq!(state.metadata.name, "Harbor Lights (cut 2)");
        assert_eq!(state.metadata.updated_at, 1_700_000_000_000);
        assert_eq!(
            state.sequence_plan.sequences[1].shots[2].prompt_modules.base,
            "close-up shot, rain on the pier"
        );
        // Neighbouring fields untouched
        assert_eq!(
            state.sequence_plan.sequences[1].shots[2].prompt_modules.camera,
            "close-up, professional cinematography"
        );
    }

    #[test]
    fn test_shot_updates_do_not_hydrate() {
        let bytes = ProjectDocument::from_components(&components())
            .unwrap()
            .save();
        let mut doc = ProjectDocument::from_bytes(&bytes).unwrap();

        doc.set_shot_prompt_base("shot-1-1", "first").unwrap();
        doc.set_shot_prompt_base("shot-3-2", "second").unwrap();
        assert!(doc.cached_state.is_none());

        let state = doc.get_state().unwrap();
        let sequences = &state.sequence_plan.sequences;
        assert_eq!(sequences[0].shots[0].prompt_modules.base, "first");
        assert_eq!(sequences[2].shots[1].prompt_modules.base, "second");
    }

    #[test]
    fn test_custom_shot_id_is_scanned() {
        let mut doc = ProjectDocument::from_components(&components()).unwrap();
        doc.update_state(|state| {
            let sequences = &mut state.sequence_plan.sequences;
            sequences[0].shots[0].id = "opening".to_string();
            sequences[1].shots[0].id = "pier-insert".to_string();
            sequences[1].shots[1].id = "shot-1-1".to_string();
        })
        .unwrap();

        doc.set_shot_prompt_base("pier-insert", "insert").unwrap();
        doc.set_shot_prompt_base("shot-1-1", "moved").unwrap();

        let state = doc.get_state().unwrap();
        let sequences = &state.sequence_plan.sequences;
        assert_eq!(sequences[1].shots[0].prompt_modules.base, "insert");
        assert_eq!(sequences[1].shots[1].prompt_modules.base, "moved");
        assert_ne!(sequences[0].shots[0].prompt_modules.base, "moved");
    }

    #[test]
    fn test_parse_shot_id() {
        assert_eq!(parse_shot_id("shot-2-3"), Some((1, 2)));
        assert_eq!(parse_shot_id("shot-0-1"), None);
        assert_eq!(parse_shot_id("shot-2"), None);
        assert_eq!(parse_shot_id("seq-2"), None);
    }

    #[test]
    fn test_unknown_shot() {
        let mut doc = ProjectDocument::from_components(&components()).unwrap();
        let err = doc.set_shot_prompt_base("shot-9-9", "x").unwrap_err();
        assert!(matches!(err, GenError::PathNotFound(_)));
    }

    #[test]
    fn test_update_state() {
        let mut doc = ProjectDocument::from_components(&components()).unwrap();
        doc.update_state(|state| state.story.themes.push("guilt".to_string()))
            .unwrap();

        let bytes = doc.save();
        let mut loaded = ProjectDocument::from_bytes(&bytes).unwrap();
        assert_eq!(loaded.get_state().unwrap().story.themes.last().unwrap(), "guilt");
    }

    #[test]
    fn test_merge_documents() {
        let mut base = ProjectDocument::from_components(&components()).unwrap();
        let bytes = base.save();
        let mut client_a = ProjectDocument::from_bytes(&bytes).unwrap();
        let mut client_b = ProjectDocument::from_bytes(&bytes).unwrap();

        client_a.set_project_name("Renamed").unwrap();
        client_b.touch_updated_at(42).unwrap();

        client_a.merge(&mut client_b).unwrap();
        client_b.merge(&mut client_a).unwrap();

        for client in [&mut client_a, &mut client_b] {
            let state = client.get_state().unwrap();
            assert_eq!(state.metadata.name, "Renamed");
            assert_eq!(state.metadata.updated_at, 42);
        }
    }

    #[test]
    fn test_incremental_sync() {
        let mut source = ProjectDocument::from_components(&components()).unwrap();
        let bytes = source.save();
        let mut peer = ProjectDocument::from_bytes(&bytes).unwrap();
        let peer_heads = peer.get_heads();

        assert!(source.generate_sync_message(&peer_heads).is_none());

        source.set_project_name("Synced").unwrap();
        let msg = source.generate_sync_message(&peer_heads).unwrap();
        peer.apply_sync_message(&msg).unwrap();

        assert_eq!(peer.get_state().unwrap().metadata.name, "Synced");
        assert_ne!(peer.actor_id(), source.actor_id());
    }
}
