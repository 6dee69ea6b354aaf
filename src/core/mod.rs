// ─── Renovation Translation Pack Core ───
// Backports the current Chinese translations onto legacy Minecraft releases
// as one resource pack per version bucket.
//
// Architecture:
//   core/
//     version/      Bucket registry + numeric release versions
//     lang/         Language file model + .lang/.json codec
//     corpus/       Read-only corpus access + key alias table
//     mapping/      Key backport against a bucket's vanilla baseline
//     pack/         pack.mcmeta + deterministic zip archives
//     coordinator/  Bucket × language matrix, outcomes, run manifest
//     state/        Settings file + output layout

pub mod coordinator;
pub mod corpus;
pub mod error;
pub mod lang;
pub mod mapping;
pub mod pack;
pub mod state;
pub mod version;
