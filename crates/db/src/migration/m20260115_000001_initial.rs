//! Initial schema: campuses, users, access grants, students, fee
//! templates, invoices, payments, and void requests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS void_requests CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoice_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS fee_templates CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS user_campus_access CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS campuses CASCADE;
DROP TYPE IF EXISTS access_level;
DROP TYPE IF EXISTS void_request_status;
DROP TYPE IF EXISTS invoice_status;
",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Enums
CREATE TYPE invoice_status AS ENUM ('unpaid', 'partial', 'paid', 'cancelled');
CREATE TYPE void_request_status AS ENUM ('pending', 'approved', 'rejected');
CREATE TYPE access_level AS ENUM ('read', 'write', 'admin');

-- Campuses
CREATE TABLE campuses (
    id UUID PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    code VARCHAR(20) NOT NULL UNIQUE,
    address TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Users
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(100) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(200) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Per-campus access grants
CREATE TABLE user_campus_access (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    campus_id UUID NOT NULL REFERENCES campuses(id) ON DELETE CASCADE,
    access_level access_level NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_user_campus UNIQUE (user_id, campus_id)
);

CREATE INDEX idx_access_user ON user_campus_access(user_id);

-- Students
CREATE TABLE students (
    id UUID PRIMARY KEY,
    campus_id UUID NOT NULL REFERENCES campuses(id),
    student_code VARCHAR(50) NOT NULL,
    full_name VARCHAR(200) NOT NULL,
    grade VARCHAR(20),
    guardian_name VARCHAR(200),
    guardian_phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_students_code UNIQUE (campus_id, student_code)
);

CREATE INDEX idx_students_campus ON students(campus_id) WHERE is_active;

-- Fee templates
CREATE TABLE fee_templates (
    id UUID PRIMARY KEY,
    campus_id UUID NOT NULL REFERENCES campuses(id),
    name VARCHAR(200) NOT NULL,
    description TEXT,
    amount NUMERIC(14, 2) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fee_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_fee_templates_campus ON fee_templates(campus_id) WHERE is_active;

-- Invoices
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    campus_id UUID NOT NULL REFERENCES campuses(id),
    student_id UUID NOT NULL REFERENCES students(id),
    invoice_number VARCHAR(40) NOT NULL UNIQUE,
    status invoice_status NOT NULL DEFAULT 'unpaid',
    total_amount NUMERIC(14, 2) NOT NULL,
    paid_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoices_total_positive CHECK (total_amount > 0),
    CONSTRAINT chk_invoices_paid_range CHECK (paid_amount >= 0 AND paid_amount <= total_amount)
);

CREATE INDEX idx_invoices_student ON invoices(student_id, issue_date DESC);
CREATE INDEX idx_invoices_campus_status ON invoices(campus_id, status);
-- For the outstanding debt report
CREATE INDEX idx_invoices_open ON invoices(campus_id, due_date)
    WHERE status IN ('unpaid', 'partial');

-- Invoice line items
CREATE TABLE invoice_items (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    description VARCHAR(500) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_items_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_items_invoice ON invoice_items(invoice_id);

-- Payments (append-only)
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    campus_id UUID NOT NULL REFERENCES campuses(id),
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    receipt_number VARCHAR(40) NOT NULL UNIQUE,
    amount NUMERIC(14, 2) NOT NULL,
    payment_method VARCHAR(50) NOT NULL,
    reference_number VARCHAR(100),
    payment_date DATE NOT NULL,
    is_voided BOOLEAN NOT NULL DEFAULT false,
    void_reason TEXT,
    voided_at TIMESTAMPTZ,
    voided_by UUID REFERENCES users(id),
    received_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payments_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_invoice ON payments(invoice_id);
-- For the daily cashbox report
CREATE INDEX idx_payments_campus_date ON payments(campus_id, payment_date);

-- Void requests
CREATE TABLE void_requests (
    id UUID PRIMARY KEY,
    campus_id UUID NOT NULL REFERENCES campuses(id),
    payment_id UUID NOT NULL REFERENCES payments(id),
    status void_request_status NOT NULL DEFAULT 'pending',
    reason TEXT NOT NULL,
    requested_by UUID NOT NULL REFERENCES users(id),
    requested_at TIMESTAMPTZ NOT NULL,
    resolved_by UUID REFERENCES users(id),
    resolved_at TIMESTAMPTZ,
    rejection_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one open request per payment
CREATE UNIQUE INDEX uq_void_requests_pending ON void_requests(payment_id)
    WHERE status = 'pending';

CREATE INDEX idx_void_requests_campus_status ON void_requests(campus_id, status);
";
