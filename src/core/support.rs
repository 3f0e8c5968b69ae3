// src/core/support.rs

//! Which programs can dump which media, and what to tell the user about it.

use crate::models::{MediaType, Program, RedumpSystem, SupportStatus};

/// Whether a program is able to dump the given media type at all.
pub fn program_supports_media(program: Program, media_type: Option<MediaType>) -> bool {
    let Some(media_type) = media_type else {
        return false;
    };

    match program {
        Program::Redumper => matches!(
            media_type,
            MediaType::CdRom | MediaType::Dvd | MediaType::GdRom
        ),
        Program::Aaru | Program::DiscImageCreator => matches!(
            media_type,
            MediaType::BluRay
                | MediaType::CdRom
                | MediaType::Dvd
                | MediaType::GdRom
                | MediaType::FloppyDisk
                | MediaType::CompactFlash
                | MediaType::SdCard
                | MediaType::FlashDrive
                | MediaType::HardDisk
                | MediaType::HdDvd
                | MediaType::NintendoGameCubeGameDisc
                | MediaType::NintendoWiiOpticalDisc
        ),
        // Only used to verify existing dumps.
        Program::CleanRip | Program::DcDumper | Program::UmdImageCreator => false,
    }
}

/// Status line for a system/media selection, independent of the program.
pub fn support_status(system: Option<RedumpSystem>, media_type: Option<MediaType>) -> SupportStatus {
    if system.is_none() {
        return SupportStatus::failure("Please select a valid system");
    }
    let Some(media_type) = media_type else {
        return SupportStatus::failure("Please select a valid media type");
    };

    match media_type {
        MediaType::BluRay
        | MediaType::CdRom
        | MediaType::Dvd
        | MediaType::FloppyDisk
        | MediaType::HardDisk
        | MediaType::CompactFlash
        | MediaType::SdCard
        | MediaType::FlashDrive
        | MediaType::HdDvd => SupportStatus::success(format!("{} ready to dump", media_type)),

        MediaType::GdRom
        | MediaType::NintendoGameCubeGameDisc
        | MediaType::NintendoWiiOpticalDisc => {
            SupportStatus::success(format!("{} partially supported for dumping", media_type))
        }

        MediaType::Umd => {
            SupportStatus::failure(format!("{} supported for submission info parsing", media_type))
        }

        MediaType::LaserDisc | MediaType::Cassette => {
            SupportStatus::failure(format!("{} media are not supported for dumping", media_type))
        }
    }
}
