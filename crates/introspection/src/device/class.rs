use super::ModelType;

/// A broad class of device, like "desktop" or "phone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "camelCase"))]
pub enum DeviceClass {
    /// A TV box, like Apple TV
    TvBox,
    /// A desktop computer, like iMac or Mac mini
    Desktop,
    /// A laptop computer, like MacBook Air
    Laptop,
    /// A tablet, like iPad
    Tablet,
    /// A phone, like iPhone
    Phone,
    /// A portable music player, like iPod
    PortableMusicPlayer,
    /// A watch, like Apple Watch
    Watch,
}

/// Every model type with a known class. Anything else is unclassified.
pub const CLASSIFIED_MODEL_TYPES: &[(&str, DeviceClass)] = &[
    ("AppleTV", DeviceClass::TvBox),
    ("iMac", DeviceClass::Desktop),
    ("iMacPro", DeviceClass::Desktop),
    ("Macmini", DeviceClass::Desktop),
    ("MacPro", DeviceClass::Desktop),
    ("MacBook", DeviceClass::Laptop),
    ("MacBookAir", DeviceClass::Laptop),
    ("MacBookPro", DeviceClass::Laptop),
    ("iPad", DeviceClass::Tablet),
    ("iPhone", DeviceClass::Phone),
    ("iPod", DeviceClass::PortableMusicPlayer),
    ("Watch", DeviceClass::Watch),
];

/// CPU architectures reported in place of a model by the iPhone simulator.
pub const SIMULATOR_MODEL_TYPES: &[&str] = &["i386", "x86_64", "arm64"];

pub const VIRTUAL_MACHINE_MODEL_TYPES: &[&str] = &["VMware"];

/// The class of device indicated by a model type, or `None` if it can't be determined.
///
/// Matching is exact and case-sensitive.
pub fn classify(model_type: &ModelType) -> Option<DeviceClass> {
    CLASSIFIED_MODEL_TYPES.iter()
        .find(|(candidate, _)| *candidate == model_type.as_str())
        .map(|(_, class)| *class)
}

/// Whether a model type likely represents a simulator.
pub fn is_simulator(model_type: &ModelType) -> bool {
    SIMULATOR_MODEL_TYPES.contains(&model_type.as_str())
}

/// Whether a model type likely represents a virtual machine.
pub fn is_virtual_machine(model_type: &ModelType) -> bool {
    VIRTUAL_MACHINE_MODEL_TYPES.contains(&model_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        assert_eq!(classify(&ModelType::new("AppleTV")), Some(DeviceClass::TvBox));
        assert_eq!(classify(&ModelType::new("Macmini")), Some(DeviceClass::Desktop));
        assert_eq!(classify(&ModelType::new("MacBookAir")), Some(DeviceClass::Laptop));
        assert_eq!(classify(&ModelType::new("iPad")), Some(DeviceClass::Tablet));
        assert_eq!(classify(&ModelType::new("iPod")), Some(DeviceClass::PortableMusicPlayer));
        assert_eq!(classify(&ModelType::new("Watch")), Some(DeviceClass::Watch));
    }

    #[test]
    fn unclassified() {
        for token in ["__UNKNOWN__", "i386", "x86_64", "arm64", "VMware", "Mac", "iphone", "MacBookAir9,1", ""] {
            assert_eq!(classify(&ModelType::new(token)), None, "{token:?}");
        }
    }

    #[test]
    fn idempotent() {
        let model_type = ModelType::new("iPhone");
        assert_eq!(classify(&model_type), classify(&model_type));
        assert_eq!(classify(&model_type), Some(DeviceClass::Phone));
    }

    #[test]
    fn predicates() {
        assert!(is_simulator(&ModelType::new("x86_64")));
        assert!(is_simulator(&ModelType::new("arm64")));
        assert!(!is_simulator(&ModelType::new("arm64e")));
        assert!(!is_simulator(&ModelType::new("VMware")));
        assert!(is_virtual_machine(&ModelType::new("VMware")));
        assert!(!is_virtual_machine(&ModelType::new("vmware")));
    }

    #[test]
    fn string_forms() {
        use strum::IntoEnumIterator;
        assert_eq!(DeviceClass::PortableMusicPlayer.to_string(), "portableMusicPlayer");
        assert_eq!("tvBox".parse::<DeviceClass>(), Ok(DeviceClass::TvBox));
        assert_eq!(DeviceClass::iter().count(), 7);
    }
}
