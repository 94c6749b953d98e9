/*!
# Payroll Form Enhancement Engine

Form-enhancement behaviors for a payroll/contract web application, built in Rust.

## Overview

This crate implements the dynamic behaviors of two salary forms: contract entry
and payroll entry. Each form carries a repeated set of deduction rows (a
formset), a live salary preview, and an inactivity watchdog that signs the user
out after a period without activity. The behaviors operate on an in-memory
form document that mirrors the field naming convention the surrounding form
framework expects, so the enhanced markup round-trips unchanged.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, a thin fetch-based glue script
- **Key Components**:
  - Row Renderer - Draws deduction rows from the engine's state snapshots
  - Preview Panel - Gross, total deductions and net salary readouts
  - Activity Reporter - Forwards user activity events and polls the watchdog

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Form Document - Fields, labels, rows and display elements with their
    name/id contract
  - Formset Manager - Row cloning, index renumbering and the total-forms
    counter
  - Preview Calculator - Deduction arithmetic and amount formatting
  - Inactivity Timer - Sliding deadline with sign-out redirection

## Key Features

- Template-row cloning with contiguous index renumbering across field names,
  ids and label targets
- Soft row deletion that keeps rows in the document for server-side processing
- Live gross/deductions/net recomputation with a zero floor on net salary
- Percentage/fixed-amount mutual exclusion per deduction row
- Inactivity sign-out with an optional return-URL parameter

## Modules

- **document**: form document model (fields, rows, labels, display elements)
- **formset**: row add/remove and index management
- **preview**: salary preview computation and formatting
- **inactivity**: activity events and the sign-out deadline
- **app**: routing and handlers (requires the `web` feature)

## REST API Endpoints

- `/api/{form}/state` - Retrieves the form document snapshot
- `/api/{form}/rows` - Appends a deduction row
- `/api/{form}/rows/{index}/delete` - Soft-deletes a row
- `/api/{form}/input` - Applies a field edit and recomputes the preview
- `/api/activity` - Reports activity / polls the sign-out deadline
- `/accounts/signout/` - Clears the session cookie
*/

// Re-export all modules so they appear in the documentation
pub mod document;
pub mod formset;
pub mod inactivity;
pub mod preview;

#[cfg(feature = "web")]
pub mod app;

/// Re-export everything from these modules to make it easier to use
pub use document::*;
pub use formset::*;
pub use inactivity::*;
pub use preview::*;
