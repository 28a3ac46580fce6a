use std::io::{self, Write};
use crate::language::ast::{AstVisitor, BinaryOperator, Expression, Program, Statement};

/// Columns added per tree level. Dumps are compared verbatim in tests, so
/// this must not change.
pub const INDENT_STEP: usize = 2;

/// Writes a pre-order, indented dump of a [`Program`] to a byte sink.
pub struct AstPrinter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> AstPrinter<W> {
    pub fn new(out: W) -> Self {
        AstPrinter { out, depth: 0 }
    }

    pub fn print(&mut self, program: &Program) -> io::Result<()> {
        program.accept::<(), _>(self)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{:indent$}{}", "", text.as_ref(), indent = self.depth * INDENT_STEP)
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self) -> io::Result<()>) -> io::Result<()> {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl<W: Write> AstVisitor<()> for AstPrinter<W> {
    type Error = io::Error;

    fn visit_program(&mut self, statements: &[Statement]) -> io::Result<()> {
        self.line("Program:")?;
        self.nested(|p| statements.iter().try_for_each(|stmt| stmt.accept(p)))
    }

    fn visit_var_declaration(&mut self, name: &str, initializer: Option<&Expression>) -> io::Result<()> {
        self.line(format!("VarDecl: {}", name))?;
        match initializer {
            Some(expr) => self.nested(|p| expr.accept(p)),
            None => Ok(()),
        }
    }

    fn visit_function_definition(&mut self, name: &str, params: &[String], body: &[Statement]) -> io::Result<()> {
        self.line(format!("FuncDef: {}", name))?;
        self.nested(|p| {
            p.line("Params:")?;
            p.nested(|p| params.iter().try_for_each(|param| p.line(param)))?;
            p.line("Body:")?;
            p.nested(|p| body.iter().try_for_each(|stmt| stmt.accept(p)))
        })
    }

    fn visit_write(&mut self, expression: &Expression) -> io::Result<()> {
        self.line("Write:")?;
        self.nested(|p| expression.accept(p))
    }

    fn visit_import(&mut self, lib_name: &str, alias: Option<&str>) -> io::Result<()> {
        match alias {
            Some(alias) => self.line(format!("Import: {} as {}", lib_name, alias)),
            None => self.line(format!("Import: {}", lib_name)),
        }
    }

    fn visit_expression_statement(&mut self, expression: &Expression) -> io::Result<()> {
        self.line("ExprStmt:")?;
        self.nested(|p| expression.accept(p))
    }

    fn visit_number_literal(&mut self, value: f64) -> io::Result<()> {
        self.line(format!("Number: {}", value))
    }

    fn visit_string_literal(&mut self, value: &str) -> io::Result<()> {
        self.line(format!("String: \"{}\"", value))
    }

    fn visit_identifier(&mut self, name: &str) -> io::Result<()> {
        self.line(format!("Identifier: {}", name))
    }

    fn visit_binary_op(&mut self, left: &Expression, operator: BinaryOperator, right: &Expression) -> io::Result<()> {
        self.line(format!("Binary: {}", operator))?;
        self.nested(|p| {
            left.accept::<(), _>(p)?;
            right.accept(p)
        })
    }

    fn visit_call(&mut self, callee: &str, args: &[Expression]) -> io::Result<()> {
        self.line(format!("Call: {}", callee))?;
        self.nested(|p| args.iter().try_for_each(|arg| arg.accept(p)))
    }
}

impl Program {
    /// The printer's output as a string.
    pub fn dump(&self) -> String {
        let mut printer = AstPrinter::new(Vec::new());
        // Writing into a Vec cannot fail.
        let _ = printer.print(self);
        String::from_utf8_lossy(&printer.into_inner()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::parser::parse;

    fn dump(source: &str) -> String {
        parse(source).unwrap().program.dump()
    }

    #[test]
    fn dumps_nested_expressions_with_two_column_steps() {
        let expected = "\
Program:
  ExprStmt:
    Call: foo
      Number: 1
      Binary: +
        Number: 2
        Number: 3
";
        assert_eq!(dump("foo(1, 2+3);"), expected);
    }

    #[test]
    fn dumps_declarations_and_function_bodies() {
        let expected = "\
Program:
  Import: mathlib
  VarDecl: x
    String: \"hi\"
  VarDecl: y
  FuncDef: show
    Params:
      a
      b
    Body:
      Write:
        Binary: *
          Identifier: a
          Identifier: b
";
        assert_eq!(dump(":mathlib:;\nlet x = \"hi\";\nlet y;\ndef show(a, b) { write a * b; }"), expected);
    }

    #[test]
    fn dumps_alias_when_present() {
        let program = Program::new(vec![Statement::Import { lib_name: "net".into(), alias: Some("N".into()) }]);
        assert_eq!(program.dump(), "Program:\n  Import: net as N\n");
    }

    #[test]
    fn empty_program_dumps_header_only() {
        assert_eq!(Program::default().dump(), "Program:\n");
    }
}
