//! Device model identification and classification.

mod class;
mod model;

pub use class::{classify, is_simulator, is_virtual_machine, DeviceClass, CLASSIFIED_MODEL_TYPES, SIMULATOR_MODEL_TYPES, VIRTUAL_MACHINE_MODEL_TYPES};
pub use model::{parse_model_identifier, parse_model_token, ModelIdentifier, ModelType, ModelVersion};

/// A device, identified by its model type.
///
/// Equality and hashing only consider the model type; the class is information about it, not part of its identity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct Device {
    model_type: ModelType,
    device_class: Option<DeviceClass>,
}

impl Device {
    /// Creates a new device.
    ///
    /// If no class is provided, it is inferred from the model type.
    pub fn new(model_type: ModelType, class: Option<DeviceClass>) -> Self {
        let device_class = class.or_else(|| classify(&model_type));
        Self { model_type, device_class }
    }

    /// The device identified by a raw hardware model identifier, like `"MacBookPro16,1"`. See [`parse_model_identifier`].
    pub fn from_raw_identifier(raw: Option<&str>) -> Self {
        Self::from(parse_model_token(raw))
    }

    /// The device's model type, like `"MacPro"` or `"iPhone"`.
    pub fn model_type(&self) -> &ModelType {
        &self.model_type
    }

    /// The broad class of the device, like "desktop" or "phone". `None` signifies that it's unknown.
    pub fn device_class(&self) -> Option<DeviceClass> {
        self.device_class
    }

    pub fn is_simulator(&self) -> bool {
        self.model_type.is_simulator()
    }

    pub fn is_virtual_machine(&self) -> bool {
        self.model_type.is_virtual_machine()
    }

    pub fn is_unknown(&self) -> bool {
        self.model_type.is_unknown()
    }
}

impl From<ModelType> for Device {
    fn from(model_type: ModelType) -> Self {
        Self::new(model_type, None)
    }
}
impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.model_type == other.model_type
    }
}
impl Eq for Device {}
impl core::hash::Hash for Device {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.model_type.hash(state)
    }
}
impl core::fmt::Display for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.model_type, f)
    }
}

macro_rules! known_devices {
    (@class $class: ident) => { Some(DeviceClass::$class) };
    (@class) => { None };
    ($($(#[$meta: meta])* $ident: ident = $model_type: literal $(=> $class: ident)?;)*) => {
        impl ModelType {
            $(
                $(#[$meta])*
                pub const $ident: Self = Self::from_static($model_type);
            )*
        }

        impl Device {
            $(
                $(#[$meta])*
                pub const $ident: Self = Self {
                    model_type: ModelType::$ident,
                    device_class: known_devices!(@class $($class)?),
                };
            )*
        }

        /// Every device with a named constant.
        pub const KNOWN_DEVICES: &[Device] = &[$(Device::$ident),*];
    };
}

known_devices! {
    /// Apple's MacBook
    MAC_BOOK = "MacBook" => Laptop;
    /// Apple's MacBook Air
    MAC_BOOK_AIR = "MacBookAir" => Laptop;
    /// Apple's MacBook Pro
    MAC_BOOK_PRO = "MacBookPro" => Laptop;

    /// Apple's iMac
    I_MAC = "iMac" => Desktop;
    /// Apple's iMac Pro
    I_MAC_PRO = "iMacPro" => Desktop;
    /// Apple's Mac mini
    MAC_MINI = "Macmini" => Desktop;
    /// Apple's Mac Pro
    MAC_PRO = "MacPro" => Desktop;

    /// Apple's iPhone
    I_PHONE = "iPhone" => Phone;
    /// Apple's iPod
    I_POD = "iPod" => PortableMusicPlayer;
    /// Apple's iPad, iPad mini, and iPad Pro
    I_PAD = "iPad" => Tablet;

    /// Apple Watch
    WATCH = "Watch" => Watch;
    /// Apple TV
    TV = "AppleTV" => TvBox;

    /// The i386 iPhone simulator
    IPHONE_SIMULATOR_I386 = "i386";
    /// The x86_64 iPhone simulator
    IPHONE_SIMULATOR_X86_64 = "x86_64";
    /// The arm64 iPhone simulator
    IPHONE_SIMULATOR_ARM64 = "arm64";
    /// A VMware virtual machine
    VM_VMWARE = "VMware";
}
