use std::fmt;
use std::str::FromStr;

/// Compositing algorithm used to project the volume to a 2D image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMethod {
    #[default]
    Mip,
    Translucent,
    Additive,
    Iso,
    AttenuatedMip,
}

impl RenderMethod {
    pub const ALL: [RenderMethod; 5] = [
        RenderMethod::Mip,
        RenderMethod::Translucent,
        RenderMethod::Additive,
        RenderMethod::Iso,
        RenderMethod::AttenuatedMip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMethod::Mip => "mip",
            RenderMethod::Translucent => "translucent",
            RenderMethod::Additive => "additive",
            RenderMethod::Iso => "iso",
            RenderMethod::AttenuatedMip => "attenuated_mip",
        }
    }
}

impl fmt::Display for RenderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mip" => Ok(RenderMethod::Mip),
            "translucent" => Ok(RenderMethod::Translucent),
            "additive" => Ok(RenderMethod::Additive),
            "iso" => Ok(RenderMethod::Iso),
            "attenuated_mip" => Ok(RenderMethod::AttenuatedMip),
            other => Err(format!("unknown rendering method: {other}")),
        }
    }
}

/// Colormap applied by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Grays,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Hot,
    Cool,
}

impl Colormap {
    pub const ALL: [Colormap; 7] = [
        Colormap::Grays,
        Colormap::Viridis,
        Colormap::Plasma,
        Colormap::Inferno,
        Colormap::Magma,
        Colormap::Hot,
        Colormap::Cool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Colormap::Grays => "grays",
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Hot => "hot",
            Colormap::Cool => "cool",
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grays" => Ok(Colormap::Grays),
            "viridis" => Ok(Colormap::Viridis),
            "plasma" => Ok(Colormap::Plasma),
            "inferno" => Ok(Colormap::Inferno),
            "magma" => Ok(Colormap::Magma),
            "hot" => Ok(Colormap::Hot),
            "cool" => Ok(Colormap::Cool),
            other => Err(format!("unknown colormap: {other}")),
        }
    }
}
