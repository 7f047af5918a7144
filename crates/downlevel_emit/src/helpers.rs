//! Runtime helper functions, emitted at most once per output file.
//!
//! Texts use `\n` internally; the emitter re-lines them through the writer
//! so the host's newline convention applies.

/// Prototype-chain inheritance for lowered classes.
pub const EXTENDS_HELPER: &str = "\
var __extends = this.__extends || function (d, b) {
    for (var p in b) if (b.hasOwnProperty(p)) d[p] = b[p];
    function __() { this.constructor = d; }
    __.prototype = b.prototype;
    d.prototype = new __();
};";

/// Decorator application, dispatching on arity like `Reflect.decorate`.
pub const DECORATE_HELPER: &str = "\
var __decorate = this.__decorate || (typeof Reflect === \"object\" && Reflect.decorate) || function (decorators, target, key, desc) {
    switch (arguments.length) {
        case 2: return decorators.reduceRight(function (o, d) { return (d && d(o)) || o; }, target);
        case 3: return decorators.reduceRight(function (o, d) { return (d && d(target, key)), void 0; }, void 0);
        case 4: return decorators.reduceRight(function (o, d) { return (d && d(target, key, o)) || o; }, desc);
    }
};";

/// Design-type metadata recording, a no-op without `Reflect.metadata`.
pub const METADATA_HELPER: &str = "\
var __metadata = this.__metadata || (typeof Reflect === \"object\" && Reflect.metadata) || function () { };";

/// Wraps a parameter decorator so it receives its parameter index.
pub const PARAM_HELPER: &str = "\
var __param = this.__param || function (index, decorator) { return function (target, key) { decorator(target, key, index); } };";

/// Re-exports every own property of a required module (`export * from`).
pub const EXPORT_STAR_HELPER: &str = "\
function __export(m) {
    for (var p in m) if (!exports.hasOwnProperty(p)) exports[p] = m[p];
}";
