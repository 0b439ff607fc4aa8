//! HTTP handlers, one module per endpoint group.
//!
//! | Group | Paths |
//! |-------|-------|
//! | `status` | `GET /api/status` |
//! | `theme`  | `PUT /api/theme` |
//! | `share`  | `POST /api/share` |
//! | `notes`  | `GET /api/notes`, `DELETE /api/notes/…` |
//! | `images` | `POST /api/images/…`, `GET /i/…` |
//! | `view`   | `GET /g/…` |

pub mod images;
pub mod notes;
pub mod share;
pub mod status;
pub mod theme;
pub mod view;
