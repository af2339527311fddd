use crate::battle::Encounter;

/// Single-slot holder for the process's one encounter.
#[derive(Debug, Default)]
pub struct EncounterStore {
    slot: Option<Encounter>,
}

impl EncounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Encounter> {
        self.slot.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Encounter> {
        self.slot.as_mut()
    }

    /// Stores `encounter`, handing back whatever it replaced.
    pub fn set(&mut self, encounter: Encounter) -> Option<Encounter> {
        self.slot.replace(encounter)
    }

}
