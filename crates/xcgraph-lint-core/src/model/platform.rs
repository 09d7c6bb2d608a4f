//! Platforms and product types.

use serde::{Deserialize, Serialize};

/// Operating system a target is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// iOS and iPadOS.
    #[serde(rename = "iOS")]
    Ios,
    /// macOS.
    #[serde(rename = "macOS")]
    MacOs,
    /// tvOS.
    #[serde(rename = "tvOS")]
    TvOs,
    /// watchOS.
    #[serde(rename = "watchOS")]
    WatchOs,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Self; 4] = [Self::Ios, Self::MacOs, Self::TvOs, Self::WatchOs];

    /// Returns true for the platforms derived from iOS (iOS, tvOS, watchOS).
    #[must_use]
    pub fn is_ios_family(self) -> bool {
        !matches!(self, Self::MacOs)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ios => "iOS",
            Self::MacOs => "macOS",
            Self::TvOs => "tvOS",
            Self::WatchOs => "watchOS",
        };
        f.write_str(name)
    }
}

/// Kind of product a target builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Product {
    /// Application.
    App,
    /// Static library (`.a`).
    StaticLibrary,
    /// Dynamic library (`.dylib`).
    DynamicLibrary,
    /// Dynamic framework.
    Framework,
    /// Static framework.
    StaticFramework,
    /// Unit test bundle.
    UnitTests,
    /// UI test bundle, run from a separate test-runner process.
    #[serde(rename = "uiTests")]
    UiTests,
    /// Resource bundle (or loadable bundle on macOS).
    Bundle,
    /// macOS command line tool.
    CommandLineTool,
    /// App Clip.
    AppClip,
    /// App extension.
    AppExtension,
    /// iMessage extension.
    MessagesExtension,
    /// Sticker pack extension.
    StickerPackExtension,
    /// watchOS 2 application.
    Watch2App,
    /// watchOS 2 extension.
    Watch2Extension,
    /// tvOS top shelf extension.
    TvTopShelfExtension,
    /// XPC service.
    Xpc,
    /// System extension.
    SystemExtension,
    /// ExtensionKit extension.
    ExtensionKitExtension,
}

impl Product {
    /// Returns true for products linked statically into their consumers.
    #[must_use]
    pub fn is_static(self) -> bool {
        matches!(self, Self::StaticLibrary | Self::StaticFramework)
    }

    /// Returns true for products that run a link step of their own and
    /// therefore absorb the static products they depend on.
    #[must_use]
    pub fn can_link_static_products(self) -> bool {
        match self {
            Self::App
            | Self::AppClip
            | Self::UnitTests
            | Self::UiTests
            | Self::CommandLineTool
            | Self::Framework
            | Self::DynamicLibrary
            | Self::AppExtension
            | Self::MessagesExtension
            | Self::StickerPackExtension
            | Self::Watch2Extension
            | Self::TvTopShelfExtension
            | Self::Xpc
            | Self::SystemExtension
            | Self::ExtensionKitExtension => true,
            Self::StaticLibrary | Self::StaticFramework | Self::Bundle | Self::Watch2App => false,
        }
    }

    /// Returns true for products a test bundle can be hosted by.
    #[must_use]
    pub fn can_host_tests(self) -> bool {
        matches!(self, Self::App | Self::AppClip | Self::Watch2App)
    }

    /// Returns true for test bundles.
    #[must_use]
    pub fn is_test(self) -> bool {
        matches!(self, Self::UnitTests | Self::UiTests)
    }

    /// Returns true if the product type can be built for `platform`.
    #[must_use]
    pub fn supports(self, platform: Platform) -> bool {
        match self {
            Self::App
            | Self::StaticLibrary
            | Self::DynamicLibrary
            | Self::Framework
            | Self::StaticFramework
            | Self::UnitTests
            | Self::UiTests
            | Self::Bundle
            | Self::AppExtension => true,
            Self::AppClip | Self::MessagesExtension | Self::StickerPackExtension => {
                platform == Platform::Ios
            }
            Self::Watch2App | Self::Watch2Extension => platform == Platform::WatchOs,
            Self::TvTopShelfExtension => platform == Platform::TvOs,
            Self::CommandLineTool | Self::Xpc | Self::SystemExtension => {
                platform == Platform::MacOs
            }
            Self::ExtensionKitExtension => matches!(platform, Platform::MacOs | Platform::Ios),
        }
    }

    /// File extension of the built product, if it has one.
    #[must_use]
    pub fn xcode_extension(self) -> Option<&'static str> {
        match self {
            Self::App | Self::AppClip | Self::Watch2App => Some("app"),
            Self::StaticLibrary => Some("a"),
            Self::DynamicLibrary => Some("dylib"),
            Self::Framework | Self::StaticFramework => Some("framework"),
            Self::UnitTests | Self::UiTests => Some("xctest"),
            Self::Bundle => Some("bundle"),
            Self::AppExtension
            | Self::MessagesExtension
            | Self::StickerPackExtension
            | Self::Watch2Extension
            | Self::TvTopShelfExtension
            | Self::ExtensionKitExtension => Some("appex"),
            Self::Xpc => Some("xpc"),
            Self::SystemExtension => Some("systemextension"),
            Self::CommandLineTool => None,
        }
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Self::App => "application",
            Self::StaticLibrary => "static library",
            Self::DynamicLibrary => "dynamic library",
            Self::Framework => "framework",
            Self::StaticFramework => "static framework",
            Self::UnitTests => "unit tests",
            Self::UiTests => "ui tests",
            Self::Bundle => "bundle",
            Self::CommandLineTool => "command line tool",
            Self::AppClip => "appClip",
            Self::AppExtension => "app extension",
            Self::MessagesExtension => "iMessage extension",
            Self::StickerPackExtension => "sticker pack extension",
            Self::Watch2App => "watch 2 application",
            Self::Watch2Extension => "watch 2 extension",
            Self::TvTopShelfExtension => "tv top shelf extension",
            Self::Xpc => "xpc",
            Self::SystemExtension => "system extension",
            Self::ExtensionKitExtension => "extensionKit extension",
        };
        f.write_str(description)
    }
}
