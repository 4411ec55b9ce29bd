use crate::config::CriteriaDefaults;
use crate::models::{AppliedFiltersByCategory, Category, Criteria, NumericRange};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum StagingError {
    #[error("'{field}' is not a {category} filter")]
    FieldNotApplicable {
        field: &'static str,
        category: Category,
    },
}

/// A single field edit to staged criteria. `None` on a scalar clears it.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaPatch {
    State(Option<String>),
    City(Option<String>),
    Format(Option<String>),
    Origin(Vec<String>),
    Stage(Vec<String>),
    Price(NumericRange),
    Area(NumericRange),
    Brand(Option<String>),
    Model(Option<String>),
    Color(Option<String>),
    Year(NumericRange),
}

impl CriteriaPatch {
    pub fn field(&self) -> &'static str {
        match self {
            CriteriaPatch::State(_) => "state",
            CriteriaPatch::City(_) => "city",
            CriteriaPatch::Format(_) => "format",
            CriteriaPatch::Origin(_) => "origin",
            CriteriaPatch::Stage(_) => "stage",
            CriteriaPatch::Price(_) => "price",
            CriteriaPatch::Area(_) => "area",
            CriteriaPatch::Brand(_) => "brand",
            CriteriaPatch::Model(_) => "model",
            CriteriaPatch::Color(_) => "color",
            CriteriaPatch::Year(_) => "year",
        }
    }

    fn applies_to(&self, category: Category) -> bool {
        match self {
            CriteriaPatch::Area(_) => category == Category::Property,
            CriteriaPatch::Brand(_)
            | CriteriaPatch::Model(_)
            | CriteriaPatch::Color(_)
            | CriteriaPatch::Year(_) => category == Category::Vehicle,
            _ => true,
        }
    }

    fn merge_into(self, criteria: &mut Criteria) {
        match (self, criteria) {
            (CriteriaPatch::State(v), c) => c.base_mut().state = v,
            (CriteriaPatch::City(v), c) => c.base_mut().city = v,
            (CriteriaPatch::Format(v), c) => c.base_mut().format = v,
            (CriteriaPatch::Origin(v), c) => c.base_mut().origin = v,
            (CriteriaPatch::Stage(v), c) => c.base_mut().stage = v,
            (CriteriaPatch::Price(v), c) => c.base_mut().price = v,
            (CriteriaPatch::Area(v), Criteria::Property(p)) => p.area = v,
            (CriteriaPatch::Brand(v), Criteria::Vehicle(veh)) => veh.brand = v,
            (CriteriaPatch::Model(v), Criteria::Vehicle(veh)) => veh.model = v,
            (CriteriaPatch::Color(v), Criteria::Vehicle(veh)) => veh.color = v,
            (CriteriaPatch::Year(v), Criteria::Vehicle(veh)) => veh.year = v,
            // Rejected by `applies_to` before merging
            _ => {}
        }
    }
}

/// Criteria being edited and criteria in effect, for one category
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFilterState {
    pub staged: Criteria,
    pub applied: Criteria,
}

impl StagedFilterState {
    fn from_defaults(criteria: Criteria) -> Self {
        Self {
            staged: criteria.clone(),
            applied: criteria,
        }
    }
}

/// Two-phase filter state for both categories.
///
/// Edits land in `staged` only. `applied` changes through `apply`, `clear`
/// and `load_persisted` and nothing else.
#[derive(Debug, Clone)]
pub struct FilterStagingStore {
    defaults: CriteriaDefaults,
    property: StagedFilterState,
    vehicle: StagedFilterState,
}

impl FilterStagingStore {
    pub fn new(defaults: CriteriaDefaults) -> Self {
        Self {
            property: StagedFilterState::from_defaults(defaults.for_category(Category::Property)),
            vehicle: StagedFilterState::from_defaults(defaults.for_category(Category::Vehicle)),
            defaults,
        }
    }

    pub fn defaults(&self) -> &CriteriaDefaults {
        &self.defaults
    }

    pub fn state(&self, category: Category) -> &StagedFilterState {
        match category {
            Category::Property => &self.property,
            Category::Vehicle => &self.vehicle,
        }
    }

    fn state_mut(&mut self, category: Category) -> &mut StagedFilterState {
        match category {
            Category::Property => &mut self.property,
            Category::Vehicle => &mut self.vehicle,
        }
    }

    pub fn staged(&self, category: Category) -> &Criteria {
        &self.state(category).staged
    }

    pub fn applied(&self, category: Category) -> &Criteria {
        &self.state(category).applied
    }

    /// Merge field patches into the staged criteria. Either every patch
    /// applies or none does.
    pub fn set_staged(
        &mut self,
        category: Category,
        patches: impl IntoIterator<Item = CriteriaPatch>,
    ) -> Result<(), StagingError> {
        let patches: Vec<CriteriaPatch> = patches.into_iter().collect();

        if let Some(bad) = patches.iter().find(|p| !p.applies_to(category)) {
            return Err(StagingError::FieldNotApplicable {
                field: bad.field(),
                category,
            });
        }

        let staged = &mut self.state_mut(category).staged;
        for patch in patches {
            patch.merge_into(staged);
        }
        Ok(())
    }

    /// Promote staged criteria to applied and return them
    pub fn apply(&mut self, category: Category) -> &Criteria {
        let state = self.state_mut(category);
        state.applied = state.staged.clone();
        debug!(%category, "applied staged filters");
        &state.applied
    }

    /// Reset staged and applied to the category defaults
    pub fn clear(&mut self, category: Category) {
        let defaults = self.defaults.for_category(category);
        *self.state_mut(category) = StagedFilterState::from_defaults(defaults);
        debug!(%category, "cleared filters");
    }

    /// Throw away staged edits
    pub fn discard(&mut self, category: Category) {
        let state = self.state_mut(category);
        state.staged = state.applied.clone();
    }

    pub fn is_dirty(&self, category: Category) -> bool {
        let state = self.state(category);
        state.staged != state.applied
    }

    /// Seed both phases from persisted applied criteria. Categories absent
    /// from `persisted` are left alone.
    pub fn load_persisted(&mut self, persisted: &AppliedFiltersByCategory) {
        if let Some(property) = &persisted.property {
            self.property = StagedFilterState::from_defaults(Criteria::Property(property.clone()));
        }
        if let Some(vehicle) = &persisted.vehicle {
            self.vehicle = StagedFilterState::from_defaults(Criteria::Vehicle(vehicle.clone()));
        }
    }

    /// Applied criteria for every category, in persisted form
    pub fn export(&self) -> AppliedFiltersByCategory {
        let property = match &self.property.applied {
            Criteria::Property(p) => Some(p.clone()),
            Criteria::Vehicle(_) => None,
        };
        let vehicle = match &self.vehicle.applied {
            Criteria::Vehicle(v) => Some(v.clone()),
            Criteria::Property(_) => None,
        };
        AppliedFiltersByCategory { property, vehicle }
    }
}

impl Default for FilterStagingStore {
    fn default() -> Self {
        Self::new(CriteriaDefaults::default())
    }
}
