use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Travel limits for the three linear axes, in machine units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelLimits {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl TravelLimits {
    /// Limits in form order: xmin, xmax, ymin, ymax, zmin, zmax
    pub fn values(&self) -> [f64; 6] {
        [
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax,
        ]
    }

    pub fn from_values(values: [f64; 6]) -> Self {
        let [xmin, xmax, ymin, ymax, zmin, zmax] = values;
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
        }
    }
}

/// A configured machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineRecord {
    pub id: String,
    pub enabled: bool,
    pub name: String,
    #[serde(flatten)]
    pub limits: TravelLimits,
}

impl Default for MachineRecord {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            enabled: true,
            name: "New Machine".to_string(),
            limits: TravelLimits::default(),
        }
    }
}

impl MachineRecord {
    pub fn new(name: impl Into<String>, limits: TravelLimits) -> Self {
        Self {
            name: name.into(),
            limits,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, update: MachineUpdate) {
        self.enabled = update.enabled;
        self.name = update.name;
        self.limits = update.limits;
    }
}

/// A reusable machine profile. Profiles carry no enabled flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfileRecord {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub limits: TravelLimits,
}

impl Default for MachineProfileRecord {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "New Machine Profile".to_string(),
            limits: TravelLimits::default(),
        }
    }
}

impl MachineProfileRecord {
    pub fn new(name: impl Into<String>, limits: TravelLimits) -> Self {
        Self {
            name: name.into(),
            limits,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, update: MachineProfileUpdate) {
        self.name = update.name;
        self.limits = update.limits;
    }
}

/// Replacement values for a machine record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineUpdate {
    pub enabled: bool,
    pub name: String,
    #[serde(flatten)]
    pub limits: TravelLimits,
}

/// Replacement values for a machine profile record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfileUpdate {
    pub name: String,
    #[serde(flatten)]
    pub limits: TravelLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_is_flat() {
        let record = MachineRecord {
            id: "m1".to_string(),
            enabled: false,
            name: "Shapeoko".to_string(),
            limits: TravelLimits {
                xmax: 400.0,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["xmax"], 400.0);
        assert_eq!(json["enabled"], false);
        assert!(json.get("limits").is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: MachineProfileRecord =
            serde_json::from_str(r#"{"id":"p1","name":"Bench","zmin":-50}"#).unwrap();
        assert_eq!(record.limits.zmin, -50.0);
        assert_eq!(record.limits.xmax, 0.0);
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut record = MachineRecord::new("Old", TravelLimits::default());
        let id = record.id.clone();
        record.apply(MachineUpdate {
            enabled: false,
            name: "New".to_string(),
            limits: TravelLimits::from_values([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        });
        assert_eq!(record.id, id);
        assert_eq!(record.name, "New");
        assert!(!record.enabled);
        assert_eq!(record.limits.values(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
