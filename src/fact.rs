//! Typed working-memory facts.
//!
//! Every fact is a tagged variant over a fixed set of clinical record kinds.
//! Two facts with the same kind and identical field values are the *same*
//! fact — assertion is idempotent and the store collapses them to one entry.
//! Facts are immutable once asserted; they are never mutated, only asserted.
//!
//! Field access for the pattern matcher goes through [`Fact::field`], which
//! returns `None` for absent optional fields. Each kind publishes its field
//! schema via [`FactKind::schema`] so rule tables can be validated at setup.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A concrete value held by a fact field: string, boolean or integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

fn opt_str(v: &Option<String>) -> Option<FieldValue> {
    v.as_ref().map(|s| FieldValue::Str(s.clone()))
}

fn opt_bool(v: &Option<bool>) -> Option<FieldValue> {
    v.map(FieldValue::Bool)
}

fn opt_int(v: &Option<i64>) -> Option<FieldValue> {
    v.map(FieldValue::Int)
}

// ---------------------------------------------------------------------------
// Fact kinds
// ---------------------------------------------------------------------------

/// The fixed set of fact kinds the engine reasons over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    Patient,
    Symptom,
    VitalSign,
    DehydrationSign,
    LabResult,
    DehydrationLevel,
    SeverityIndicator,
    Diagnosis,
    TreatmentPlan,
}

impl FactKind {
    /// The field names this kind carries. Rule guards referencing any other
    /// field are rejected at rule-set construction.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &[
                "age",
                "is_child",
                "is_pregnant",
                "travel_endemic_area",
                "endemic_resident",
                "blood_group",
                "household_contact",
                "unsafe_water",
                "street_food",
            ],
            Self::Symptom => &[
                "name",
                "present",
                "severity",
                "duration_days",
                "pattern",
                "description",
            ],
            Self::VitalSign => &["measure", "value", "unit", "interpretation"],
            Self::DehydrationSign => &["sign", "finding"],
            Self::LabResult => &["test", "result", "details"],
            Self::DehydrationLevel => &["level", "treatment_plan"],
            Self::SeverityIndicator => &["indicator", "disease", "action"],
            Self::Diagnosis => &["disease", "confidence", "reason", "severity", "recommendation"],
            Self::TreatmentPlan => &[
                "disease",
                "plan_type",
                "medication",
                "dosage",
                "duration",
                "notes",
            ],
        }
    }

    /// Whether `field` exists in this kind's schema.
    pub fn has_field(self, field: &str) -> bool {
        self.schema().contains(&field)
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Patient => "patient",
            Self::Symptom => "symptom",
            Self::VitalSign => "vital_sign",
            Self::DehydrationSign => "dehydration_sign",
            Self::LabResult => "lab_result",
            Self::DehydrationLevel => "dehydration_level",
            Self::SeverityIndicator => "severity_indicator",
            Self::Diagnosis => "diagnosis",
            Self::TreatmentPlan => "treatment_plan",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Confidence vocabulary
// ---------------------------------------------------------------------------

/// Diagnostic confidence, strongest first.
///
/// The declaration order doubles as the fixed presentation rank used by the
/// service layer when sorting diagnoses for display; the engine itself emits
/// in firing order and never re-sorts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Confirmed,
    Confident,
    Suspect,
    Uncertain,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Confident => "confident",
            Self::Suspect => "suspect",
            Self::Uncertain => "uncertain",
        }
    }

    /// Presentation rank: confirmed 0, confident 1, suspect 2, uncertain 3.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fact kinds: record structs
// ---------------------------------------------------------------------------

/// Patient demographics and exposure history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patient {
    pub age: Option<i64>,
    pub is_child: Option<bool>,
    pub is_pregnant: Option<bool>,
    pub travel_endemic_area: Option<bool>,
    pub endemic_resident: Option<bool>,
    pub blood_group: Option<String>,
    pub household_contact: Option<bool>,
    pub unsafe_water: Option<bool>,
    pub street_food: Option<bool>,
}

impl Patient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self.is_child = Some(age < 18);
        self
    }

    pub fn with_is_pregnant(mut self, v: bool) -> Self {
        self.is_pregnant = Some(v);
        self
    }

    pub fn with_travel_endemic_area(mut self, v: bool) -> Self {
        self.travel_endemic_area = Some(v);
        self
    }

    pub fn with_endemic_resident(mut self, v: bool) -> Self {
        self.endemic_resident = Some(v);
        self
    }

    pub fn with_blood_group(mut self, v: impl Into<String>) -> Self {
        self.blood_group = Some(v.into());
        self
    }

    pub fn with_household_contact(mut self, v: bool) -> Self {
        self.household_contact = Some(v);
        self
    }

    pub fn with_unsafe_water(mut self, v: bool) -> Self {
        self.unsafe_water = Some(v);
        self
    }

    pub fn with_street_food(mut self, v: bool) -> Self {
        self.street_food = Some(v);
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "age" => opt_int(&self.age),
            "is_child" => opt_bool(&self.is_child),
            "is_pregnant" => opt_bool(&self.is_pregnant),
            "travel_endemic_area" => opt_bool(&self.travel_endemic_area),
            "endemic_resident" => opt_bool(&self.endemic_resident),
            "blood_group" => opt_str(&self.blood_group),
            "household_contact" => opt_bool(&self.household_contact),
            "unsafe_water" => opt_bool(&self.unsafe_water),
            "street_food" => opt_bool(&self.street_food),
            _ => None,
        }
    }
}

/// A single symptom observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symptom {
    pub name: String,
    pub present: Option<bool>,
    pub severity: Option<String>,
    pub duration_days: Option<i64>,
    pub pattern: Option<String>,
    pub description: Option<String>,
}

impl Symptom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            present: None,
            severity: None,
            duration_days: None,
            pattern: None,
            description: None,
        }
    }

    pub fn with_present(mut self, v: bool) -> Self {
        self.present = Some(v);
        self
    }

    pub fn with_severity(mut self, v: impl Into<String>) -> Self {
        self.severity = Some(v.into());
        self
    }

    pub fn with_duration_days(mut self, v: i64) -> Self {
        self.duration_days = Some(v);
        self
    }

    pub fn with_pattern(mut self, v: impl Into<String>) -> Self {
        self.pattern = Some(v.into());
        self
    }

    pub fn with_description(mut self, v: impl Into<String>) -> Self {
        self.description = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Str(self.name.clone())),
            "present" => opt_bool(&self.present),
            "severity" => opt_str(&self.severity),
            "duration_days" => opt_int(&self.duration_days),
            "pattern" => opt_str(&self.pattern),
            "description" => opt_str(&self.description),
            _ => None,
        }
    }
}

/// A vital sign measurement.
///
/// `value` is an integer in the measurement's native unit; the field matched
/// by rules is the clinician's `interpretation` (normal/low/high/critical).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VitalSign {
    pub measure: String,
    pub value: Option<i64>,
    pub unit: Option<String>,
    pub interpretation: Option<String>,
}

impl VitalSign {
    pub fn new(measure: impl Into<String>) -> Self {
        Self {
            measure: measure.into(),
            value: None,
            unit: None,
            interpretation: None,
        }
    }

    pub fn with_value(mut self, v: i64) -> Self {
        self.value = Some(v);
        self
    }

    pub fn with_unit(mut self, v: impl Into<String>) -> Self {
        self.unit = Some(v.into());
        self
    }

    pub fn with_interpretation(mut self, v: impl Into<String>) -> Self {
        self.interpretation = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "measure" => Some(FieldValue::Str(self.measure.clone())),
            "value" => opt_int(&self.value),
            "unit" => opt_str(&self.unit),
            "interpretation" => opt_str(&self.interpretation),
            _ => None,
        }
    }
}

/// A WHO dehydration assessment sign (skin pinch, eyes, mental state, thirst).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DehydrationSign {
    pub sign: String,
    pub finding: String,
}

impl DehydrationSign {
    pub fn new(sign: impl Into<String>, finding: impl Into<String>) -> Self {
        Self {
            sign: sign.into(),
            finding: finding.into(),
        }
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "sign" => Some(FieldValue::Str(self.sign.clone())),
            "finding" => Some(FieldValue::Str(self.finding.clone())),
            _ => None,
        }
    }
}

/// A laboratory test result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabResult {
    pub test: String,
    pub result: Option<String>,
    pub details: Option<String>,
}

impl LabResult {
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            result: None,
            details: None,
        }
    }

    pub fn with_result(mut self, v: impl Into<String>) -> Self {
        self.result = Some(v.into());
        self
    }

    pub fn with_details(mut self, v: impl Into<String>) -> Self {
        self.details = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "test" => Some(FieldValue::Str(self.test.clone())),
            "result" => opt_str(&self.result),
            "details" => opt_str(&self.details),
            _ => None,
        }
    }
}

/// Derived WHO dehydration classification (none/some/severe → plan A/B/C).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DehydrationLevel {
    pub level: String,
    pub treatment_plan: Option<String>,
}

impl DehydrationLevel {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            treatment_plan: None,
        }
    }

    pub fn with_treatment_plan(mut self, v: impl Into<String>) -> Self {
        self.treatment_plan = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "level" => Some(FieldValue::Str(self.level.clone())),
            "treatment_plan" => opt_str(&self.treatment_plan),
            _ => None,
        }
    }
}

/// A danger-sign marker for severe or complicated disease.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeverityIndicator {
    pub indicator: String,
    pub disease: Option<String>,
    pub action: Option<String>,
}

impl SeverityIndicator {
    pub fn new(indicator: impl Into<String>) -> Self {
        Self {
            indicator: indicator.into(),
            disease: None,
            action: None,
        }
    }

    pub fn with_disease(mut self, v: impl Into<String>) -> Self {
        self.disease = Some(v.into());
        self
    }

    pub fn with_action(mut self, v: impl Into<String>) -> Self {
        self.action = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "indicator" => Some(FieldValue::Str(self.indicator.clone())),
            "disease" => opt_str(&self.disease),
            "action" => opt_str(&self.action),
            _ => None,
        }
    }
}

/// A diagnostic conclusion derived by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnosis {
    pub disease: String,
    pub confidence: Confidence,
    pub reason: String,
    pub severity: Option<String>,
    pub recommendation: Option<String>,
}

impl Diagnosis {
    pub fn new(
        disease: impl Into<String>,
        confidence: Confidence,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            disease: disease.into(),
            confidence,
            reason: reason.into(),
            severity: None,
            recommendation: None,
        }
    }

    pub fn with_severity(mut self, v: impl Into<String>) -> Self {
        self.severity = Some(v.into());
        self
    }

    pub fn with_recommendation(mut self, v: impl Into<String>) -> Self {
        self.recommendation = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "disease" => Some(FieldValue::Str(self.disease.clone())),
            "confidence" => Some(FieldValue::Str(self.confidence.as_str().to_string())),
            "reason" => Some(FieldValue::Str(self.reason.clone())),
            "severity" => opt_str(&self.severity),
            "recommendation" => opt_str(&self.recommendation),
            _ => None,
        }
    }
}

/// A treatment recommendation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub disease: String,
    pub plan_type: Option<String>,
    pub medication: Option<String>,
    pub dosage: Option<String>,
    pub duration: Option<String>,
    pub notes: Option<String>,
}

impl TreatmentPlan {
    pub fn new(disease: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            plan_type: None,
            medication: None,
            dosage: None,
            duration: None,
            notes: None,
        }
    }

    pub fn with_plan_type(mut self, v: impl Into<String>) -> Self {
        self.plan_type = Some(v.into());
        self
    }

    pub fn with_medication(mut self, v: impl Into<String>) -> Self {
        self.medication = Some(v.into());
        self
    }

    pub fn with_dosage(mut self, v: impl Into<String>) -> Self {
        self.dosage = Some(v.into());
        self
    }

    pub fn with_duration(mut self, v: impl Into<String>) -> Self {
        self.duration = Some(v.into());
        self
    }

    pub fn with_notes(mut self, v: impl Into<String>) -> Self {
        self.notes = Some(v.into());
        self
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "disease" => Some(FieldValue::Str(self.disease.clone())),
            "plan_type" => opt_str(&self.plan_type),
            "medication" => opt_str(&self.medication),
            "dosage" => opt_str(&self.dosage),
            "duration" => opt_str(&self.duration),
            "notes" => opt_str(&self.notes),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// The fact sum type
// ---------------------------------------------------------------------------

/// An immutable, typed record in working memory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fact {
    Patient(Patient),
    Symptom(Symptom),
    VitalSign(VitalSign),
    DehydrationSign(DehydrationSign),
    LabResult(LabResult),
    DehydrationLevel(DehydrationLevel),
    SeverityIndicator(SeverityIndicator),
    Diagnosis(Diagnosis),
    TreatmentPlan(TreatmentPlan),
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Self::Patient(_) => FactKind::Patient,
            Self::Symptom(_) => FactKind::Symptom,
            Self::VitalSign(_) => FactKind::VitalSign,
            Self::DehydrationSign(_) => FactKind::DehydrationSign,
            Self::LabResult(_) => FactKind::LabResult,
            Self::DehydrationLevel(_) => FactKind::DehydrationLevel,
            Self::SeverityIndicator(_) => FactKind::SeverityIndicator,
            Self::Diagnosis(_) => FactKind::Diagnosis,
            Self::TreatmentPlan(_) => FactKind::TreatmentPlan,
        }
    }

    /// The value of `field`, or `None` if the field is absent or unknown.
    pub fn field(&self, field: &str) -> Option<FieldValue> {
        match self {
            Self::Patient(f) => f.field(field),
            Self::Symptom(f) => f.field(field),
            Self::VitalSign(f) => f.field(field),
            Self::DehydrationSign(f) => f.field(field),
            Self::LabResult(f) => f.field(field),
            Self::DehydrationLevel(f) => f.field(field),
            Self::SeverityIndicator(f) => f.field(field),
            Self::Diagnosis(f) => f.field(field),
            Self::TreatmentPlan(f) => f.field(field),
        }
    }
}

impl From<Patient> for Fact {
    fn from(f: Patient) -> Self {
        Self::Patient(f)
    }
}

impl From<Symptom> for Fact {
    fn from(f: Symptom) -> Self {
        Self::Symptom(f)
    }
}

impl From<VitalSign> for Fact {
    fn from(f: VitalSign) -> Self {
        Self::VitalSign(f)
    }
}

impl From<DehydrationSign> for Fact {
    fn from(f: DehydrationSign) -> Self {
        Self::DehydrationSign(f)
    }
}

impl From<LabResult> for Fact {
    fn from(f: LabResult) -> Self {
        Self::LabResult(f)
    }
}

impl From<DehydrationLevel> for Fact {
    fn from(f: DehydrationLevel) -> Self {
        Self::DehydrationLevel(f)
    }
}

impl From<SeverityIndicator> for Fact {
    fn from(f: SeverityIndicator) -> Self {
        Self::SeverityIndicator(f)
    }
}

impl From<Diagnosis> for Fact {
    fn from(f: Diagnosis) -> Self {
        Self::Diagnosis(f)
    }
}

impl From<TreatmentPlan> for Fact {
    fn from(f: TreatmentPlan) -> Self {
        Self::TreatmentPlan(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_facts_are_equal() {
        let a: Fact = Symptom::new("fever").with_present(true).with_pattern("cyclical").into();
        let b: Fact = Symptom::new("fever").with_present(true).with_pattern("cyclical").into();
        assert_eq!(a, b);
    }

    #[test]
    fn differing_optional_field_distinguishes_facts() {
        let a: Fact = Symptom::new("fever").with_present(true).into();
        let b: Fact = Symptom::new("fever").with_present(true).with_duration_days(3).into();
        assert_ne!(a, b);
    }

    #[test]
    fn field_access_present_and_absent() {
        let fact: Fact = Symptom::new("fever").with_present(true).into();
        assert_eq!(fact.field("name"), Some(FieldValue::Str("fever".into())));
        assert_eq!(fact.field("present"), Some(FieldValue::Bool(true)));
        assert_eq!(fact.field("pattern"), None);
        assert_eq!(fact.field("no_such_field"), None);
    }

    #[test]
    fn confidence_is_matchable_as_string() {
        let fact: Fact = Diagnosis::new("cholera", Confidence::Confirmed, "culture").into();
        assert_eq!(
            fact.field("confidence"),
            Some(FieldValue::Str("confirmed".into()))
        );
    }

    #[test]
    fn confidence_rank_is_presentation_order() {
        assert_eq!(Confidence::Confirmed.rank(), 0);
        assert_eq!(Confidence::Confident.rank(), 1);
        assert_eq!(Confidence::Suspect.rank(), 2);
        assert_eq!(Confidence::Uncertain.rank(), 3);
    }

    #[test]
    fn schema_covers_every_field_accessor() {
        let fact: Fact = Patient::new()
            .with_age(30)
            .with_travel_endemic_area(true)
            .into();
        for field in FactKind::Patient.schema() {
            // Accessor must recognize the name even when the value is absent.
            let _ = fact.field(field);
        }
        assert!(FactKind::Patient.has_field("unsafe_water"));
        assert!(!FactKind::Patient.has_field("pattern"));
    }

    #[test]
    fn patient_age_derives_is_child() {
        let child = Patient::new().with_age(9);
        assert_eq!(child.is_child, Some(true));
        let adult = Patient::new().with_age(40);
        assert_eq!(adult.is_child, Some(false));
    }
}
