use strum::{Display, EnumString, IntoStaticStr};

use crate::pattern::Pattern;

/// `mov eax, [rcx+0x1D53C4]`
const GET_RAID_PATTERN: [u8; 6] = [0x8B, 0x81, 0xC4, 0x53, 0x1D, 0x00];
/// `psrldq xmm2, 8; movd [r8+4], xmm2; movsd ...`
const SET_RAID_PATTERN: [u8; 15] = [
    0x66, 0x0F, 0x73, 0xDA, 0x08, 0x66, 0x41, 0x0F, 0x7E, 0x50, 0x04, 0xF2, 0x0F, 0x11, 0x4C,
];
/// `cmp dword ptr [rax+0x10], 2; je +0x10`
const RAID_STATUS_PATTERN: [u8; 6] = [0x83, 0x78, 0x10, 0x02, 0x74, 0x10];

/// Opcode of `mov eax, imm32`; also the first byte of the detection marker.
pub const MOV_EAX_IMM32: u8 = 0xB8;
/// `mov dword ptr [r8+4], imm32`
const MOV_R8_DISP4_IMM32: [u8; 4] = [0x41, 0xC7, 0x40, 0x04];
/// `cmp eax, eax`
const CMP_EAX_EAX: [u8; 2] = [0x39, 0xC0];
pub const NOP: u8 = 0x90;

/// The patches that make up a raid patch set, in application order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum PatchKind {
    /// Raid getter returns the parameter as an immediate.
    GetRaid,
    /// Raid setter stores the parameter instead of the selected value.
    SetRaid,
    /// Raid availability check always succeeds.
    RaidStatus,
}

impl PatchKind {
    pub const ALL: [PatchKind; 3] = [
        PatchKind::GetRaid,
        PatchKind::SetRaid,
        PatchKind::RaidStatus,
    ];

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Human readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            PatchKind::GetRaid => "Get Raid",
            PatchKind::SetRaid => "Set Raid",
            PatchKind::RaidStatus => "Raid Status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub kind: PatchKind,
    pub pattern: Pattern,
    pub replacement: Vec<u8>,
}

impl Patch {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Ordered collection of patches generated from one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSet {
    patches: Vec<Patch>,
}

impl PatchSet {
    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    pub fn get(&self, kind: PatchKind) -> Option<&Patch> {
        self.patches.iter().find(|p| p.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatchSet {
    type Item = &'a Patch;
    type IntoIter = std::slice::Iter<'a, Patch>;

    fn into_iter(self) -> Self::IntoIter {
        self.patches.iter()
    }
}

/// Serialize the parameter the way it is embedded in replacements.
pub fn encode_parameter(parameter: u32) -> [u8; 4] {
    parameter.to_le_bytes()
}

/// Build the raid patch set for `parameter`.
///
/// The bound on valid raid indices is the caller's concern; any `u32` is
/// encoded as-is.
pub fn build_patch_set(parameter: u32) -> PatchSet {
    let value = encode_parameter(parameter);

    // mov eax, imm32; nop
    let mut get_raid = Vec::with_capacity(GET_RAID_PATTERN.len());
    get_raid.push(MOV_EAX_IMM32);
    get_raid.extend_from_slice(&value);
    get_raid.push(NOP);

    // mov dword ptr [r8+4], imm32; nop x3
    let mut set_raid = Vec::with_capacity(11);
    set_raid.extend_from_slice(&MOV_R8_DISP4_IMM32);
    set_raid.extend_from_slice(&value);
    set_raid.extend_from_slice(&[NOP; 3]);

    let mut raid_status = CMP_EAX_EAX.to_vec();
    raid_status.extend_from_slice(&[NOP; 2]);

    let patches = vec![
        Patch {
            kind: PatchKind::GetRaid,
            pattern: exact(&GET_RAID_PATTERN),
            replacement: get_raid,
        },
        Patch {
            kind: PatchKind::SetRaid,
            pattern: exact(&SET_RAID_PATTERN),
            replacement: set_raid,
        },
        Patch {
            kind: PatchKind::RaidStatus,
            pattern: exact(&RAID_STATUS_PATTERN),
            replacement: raid_status,
        },
    ];

    PatchSet { patches }
}

fn exact(bytes: &[u8]) -> Pattern {
    Pattern::exact(bytes).unwrap_or_else(|_| unreachable!("built-in signatures are non-empty"))
}
