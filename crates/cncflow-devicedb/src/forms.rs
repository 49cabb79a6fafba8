//! Update forms for machine and machine profile records
//!
//! Forms hold the edited values as text, the way an entry widget reports
//! them. Numbers are coerced leniently on submit, following the numeric
//! literal rules of a browser entry field: decimal and exponent notation,
//! unsigned `0x`/`0o`/`0b` integers and the exact words `Infinity`,
//! `+Infinity` and `-Infinity`. Anything else becomes `0`.

use crate::error::{DeviceError, DeviceResult, ProfileError, ProfileResult};
use crate::model::{
    MachineProfileRecord, MachineProfileUpdate, MachineRecord, MachineUpdate, TravelLimits,
};
use crate::store::RecordStore;

/// Parse a numeric field, falling back to `0.0` for empty or invalid text.
///
/// Negative zero also becomes `0.0`.
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim();
    let value = match text {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => parse_prefixed(text).unwrap_or_else(|| parse_decimal(text)),
    };
    value.filter(|v| *v != 0.0).unwrap_or(0.0)
}

/// `0x`, `0o` or `0b` integers. `None` when there is no such prefix.
fn parse_prefixed(text: &str) -> Option<Option<f64>> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }
    Some(digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    }))
}

/// Decimal literal with optional sign, fraction and exponent.
///
/// `f64::from_str` also takes `inf`, `infinity` and `nan` in any case; those
/// are rejected here.
fn parse_decimal(text: &str) -> Option<f64> {
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Text values of the six travel-limit fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LimitFields {
    pub xmin: String,
    pub xmax: String,
    pub ymin: String,
    pub ymax: String,
    pub zmin: String,
    pub zmax: String,
}

impl From<&TravelLimits> for LimitFields {
    fn from(limits: &TravelLimits) -> Self {
        Self {
            xmin: limits.xmin.to_string(),
            xmax: limits.xmax.to_string(),
            ymin: limits.ymin.to_string(),
            ymax: limits.ymax.to_string(),
            zmin: limits.zmin.to_string(),
            zmax: limits.zmax.to_string(),
        }
    }
}

impl LimitFields {
    pub fn coerce(&self) -> TravelLimits {
        TravelLimits {
            xmin: coerce_number(&self.xmin),
            xmax: coerce_number(&self.xmax),
            ymin: coerce_number(&self.ymin),
            ymax: coerce_number(&self.ymax),
            zmin: coerce_number(&self.zmin),
            zmax: coerce_number(&self.zmax),
        }
    }
}

fn require_name(name: &str) -> ProfileResult<()> {
    if name.trim().is_empty() {
        return Err(ProfileError::MissingField("name".to_string()));
    }
    Ok(())
}

/// Edits a [`MachineRecord`]
#[derive(Debug, Clone)]
pub struct MachineUpdateForm {
    id: String,
    initial: (bool, String, LimitFields),
    pub enabled: bool,
    pub name: String,
    pub limits: LimitFields,
    alert_message: Option<String>,
}

impl From<&MachineRecord> for MachineUpdateForm {
    fn from(record: &MachineRecord) -> Self {
        let limits = LimitFields::from(&record.limits);
        Self {
            id: record.id.clone(),
            initial: (record.enabled, record.name.clone(), limits.clone()),
            enabled: record.enabled,
            name: record.name.clone(),
            limits,
            alert_message: None,
        }
    }
}

impl MachineUpdateForm {
    /// ID of the record being edited
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether nothing has been edited since the form was opened
    pub fn is_pristine(&self) -> bool {
        self.initial.0 == self.enabled && self.initial.1 == self.name && self.initial.2 == self.limits
    }

    pub fn validate(&self) -> ProfileResult<()> {
        require_name(&self.name)
    }

    /// Whether the OK button is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_pristine() && self.validate().is_ok()
    }

    /// Coerce the edited values into a record update
    pub fn to_update(&self) -> ProfileResult<MachineUpdate> {
        self.validate()?;
        Ok(MachineUpdate {
            enabled: self.enabled,
            name: self.name.clone(),
            limits: self.limits.coerce(),
        })
    }

    /// Apply the form to the store with a forced reload.
    ///
    /// On failure the error is also kept as the form's alert message.
    pub fn submit(&mut self, store: &RecordStore) -> DeviceResult<MachineRecord> {
        let result = self.try_submit(store);
        match &result {
            Ok(record) => {
                tracing::info!("Machine {} updated", record.id);
                *self = Self::from(record);
            }
            Err(e) => {
                tracing::warn!("Machine update failed: {}", e);
                self.alert_message = Some(e.to_string());
            }
        }
        result
    }

    fn try_submit(&self, store: &RecordStore) -> DeviceResult<MachineRecord> {
        if self.is_pristine() {
            return Err(ProfileError::Pristine.into());
        }
        let update = self.to_update()?;
        store.update_machine(&self.id, update, true)
    }

    pub fn alert_message(&self) -> Option<&str> {
        self.alert_message.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert_message = None;
    }
}

/// Edits a [`MachineProfileRecord`]
#[derive(Debug, Clone)]
pub struct MachineProfileUpdateForm {
    id: String,
    initial: (String, LimitFields),
    pub name: String,
    pub limits: LimitFields,
    alert_message: Option<String>,
}

impl From<&MachineProfileRecord> for MachineProfileUpdateForm {
    fn from(record: &MachineProfileRecord) -> Self {
        let limits = LimitFields::from(&record.limits);
        Self {
            id: record.id.clone(),
            initial: (record.name.clone(), limits.clone()),
            name: record.name.clone(),
            limits,
            alert_message: None,
        }
    }
}

impl MachineProfileUpdateForm {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_pristine(&self) -> bool {
        self.initial.0 == self.name && self.initial.1 == self.limits
    }

    pub fn validate(&self) -> ProfileResult<()> {
        require_name(&self.name)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_pristine() && self.validate().is_ok()
    }

    pub fn to_update(&self) -> ProfileResult<MachineProfileUpdate> {
        self.validate()?;
        Ok(MachineProfileUpdate {
            name: self.name.clone(),
            limits: self.limits.coerce(),
        })
    }

    /// Apply the form to the store with a forced reload
    pub fn submit(&mut self, store: &RecordStore) -> DeviceResult<MachineProfileRecord> {
        let result = if self.is_pristine() {
            Err(ProfileError::Pristine.into())
        } else {
            self.to_update()
                .map_err(DeviceError::from)
                .and_then(|update| store.update_machine_profile(&self.id, update, true))
        };

        match &result {
            Ok(record) => *self = Self::from(record),
            Err(e) => {
                tracing::warn!("Machine profile update failed: {}", e);
                self.alert_message = Some(e.to_string());
            }
        }
        result
    }

    pub fn alert_message(&self) -> Option<&str> {
        self.alert_message.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert_message = None;
    }
}
