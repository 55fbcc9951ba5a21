use std::fmt;

/// Renderer backends the plugin knows how to drive. Anything else is kept
/// verbatim in `Other` and rendered with the scene's own settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RendererKind {
    File,
    MayaSoftware,
    MayaHardware,
    MayaHardware2,
    MayaVector,
    MayaKrakatoa,
    MentalRay,
    MentalRayExport,
    Vray,
    VrayExport,
    Arnold,
    ArnoldExport,
    Redshift,
    Renderman,
    RendermanRis,
    RendermanExport,
    Renderman22,
    Renderman22Export,
    ThreeDelight,
    Maxwell,
    MaxwellExport,
    Gelato,
    FinalRender,
    Turtle,
    OctaneRender,
    CausticVisualizer,
    Iray,
    Other(String),
}

impl RendererKind {
    /// Parse the `Renderer` plugin info entry (case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let name = raw.trim().to_ascii_lowercase();
        match name.as_str() {
            "file" => Self::File,
            "mayasoftware" => Self::MayaSoftware,
            "mayahardware" => Self::MayaHardware,
            "mayahardware2" => Self::MayaHardware2,
            "mayavector" => Self::MayaVector,
            "mayakrakatoa" => Self::MayaKrakatoa,
            "mentalray" => Self::MentalRay,
            "mentalrayexport" => Self::MentalRayExport,
            "vray" => Self::Vray,
            "vrayexport" => Self::VrayExport,
            "arnold" => Self::Arnold,
            "arnoldexport" => Self::ArnoldExport,
            "redshift" => Self::Redshift,
            "renderman" => Self::Renderman,
            "rendermanris" => Self::RendermanRis,
            "rendermanexport" => Self::RendermanExport,
            "renderman22" => Self::Renderman22,
            "renderman22export" => Self::Renderman22Export,
            "3delight" => Self::ThreeDelight,
            "maxwell" => Self::Maxwell,
            "maxwellexport" => Self::MaxwellExport,
            "gelato" => Self::Gelato,
            "finalrender" => Self::FinalRender,
            "turtle" => Self::Turtle,
            "octanerender" => Self::OctaneRender,
            "causticvisualizer" => Self::CausticVisualizer,
            "ifmirayphotoreal" => Self::Iray,
            _ => Self::Other(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File => "file",
            Self::MayaSoftware => "mayasoftware",
            Self::MayaHardware => "mayahardware",
            Self::MayaHardware2 => "mayahardware2",
            Self::MayaVector => "mayavector",
            Self::MayaKrakatoa => "mayakrakatoa",
            Self::MentalRay => "mentalray",
            Self::MentalRayExport => "mentalrayexport",
            Self::Vray => "vray",
            Self::VrayExport => "vrayexport",
            Self::Arnold => "arnold",
            Self::ArnoldExport => "arnoldexport",
            Self::Redshift => "redshift",
            Self::Renderman => "renderman",
            Self::RendermanRis => "rendermanris",
            Self::RendermanExport => "rendermanexport",
            Self::Renderman22 => "renderman22",
            Self::Renderman22Export => "renderman22export",
            Self::ThreeDelight => "3delight",
            Self::Maxwell => "maxwell",
            Self::MaxwellExport => "maxwellexport",
            Self::Gelato => "gelato",
            Self::FinalRender => "finalrender",
            Self::Turtle => "turtle",
            Self::OctaneRender => "octanerender",
            Self::CausticVisualizer => "causticvisualizer",
            Self::Iray => "ifmirayphotoreal",
            Self::Other(name) => name,
        }
    }

    pub fn is_vray(&self) -> bool {
        matches!(self, Self::Vray | Self::VrayExport)
    }

    pub fn is_arnold(&self) -> bool {
        matches!(self, Self::Arnold | Self::ArnoldExport)
    }

    /// RenderMan flavours that report `rfm Notice: Rendering ... at N`.
    pub fn is_classic_renderman(&self) -> bool {
        matches!(
            self,
            Self::Renderman | Self::RendermanRis | Self::RendermanExport
        )
    }

    /// Exporters write scene descriptions rather than images, so they never
    /// render to a local directory.
    pub fn is_export_only(&self) -> bool {
        matches!(
            self,
            Self::MentalRayExport
                | Self::VrayExport
                | Self::RendermanExport
                | Self::Renderman22
                | Self::Renderman22Export
        )
    }

    /// V-Ray can't renumber output frames (`-rfs`).
    pub fn allows_frame_renumbering(&self) -> bool {
        !matches!(self, Self::Vray)
    }

    /// Renderers that ignore `-rd` / `-im`.
    pub fn accepts_output_arguments(&self) -> bool {
        !matches!(
            self,
            Self::ThreeDelight | Self::Renderman22 | Self::Renderman22Export
        )
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_round_trips_names() {
        for raw in ["mayaSoftware", "VRay", "3delight", "ifmIrayPhotoreal", "OctaneRender"] {
            let kind = RendererKind::parse(raw);
            assert!(!matches!(kind, RendererKind::Other(_)), "{raw}");
            assert_eq!(RendererKind::parse(kind.name()), kind);
        }
    }

    #[test]
    fn unknown_renderers_are_preserved() {
        let kind = RendererKind::parse("Cycles");
        assert_eq!(kind, RendererKind::Other("cycles".to_string()));
        assert_eq!(kind.to_string(), "cycles");
    }

    #[test]
    fn only_vray_blocks_renumbering() {
        assert!(!RendererKind::Vray.allows_frame_renumbering());
        assert!(RendererKind::VrayExport.allows_frame_renumbering());
        assert!(!RendererKind::ThreeDelight.accepts_output_arguments());
    }
}
