use super::ast::{
    literal_value, AssignOp, BinaryOp, DataType, Declaration, Expr, Function, Param, Program,
    Stmt, UnaryOp,
};
use super::parsercore::Parser;
use super::token::{Token, TokenKind::*};
use crate::error::{Error, TokenInfo};
use crate::{check, expect, optional, repeat};

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn parse(mut self) -> Result<Program, Error> {
        self.parse_program()
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// program = { func-def | decl | stmt } EOF
    fn parse_program(&mut self) -> Result<Program, Error> {
        let mut program = Program::default();
        while !check!(self, Eof) && self.peek().is_some() {
            if check!(self, Int | Char | Void) {
                let is_func = matches!(self.peek_nth(1), Some(Token { kind: Identifier(_), .. }))
                    && matches!(self.peek_nth(2), Some(Token { kind: LParen, .. }));
                if is_func {
                    program.functions.push(self.parse_function()?);
                } else {
                    program.declarations.push(self.parse_declaration()?);
                }
            } else {
                program.statements.push(self.parse_stmt()?);
            }
        }
        Ok(program)
    }

    /// type = "int" | "char" | "void"
    fn parse_type(&mut self) -> Result<DataType, Error> {
        let token = expect!(self, Int | Char | Void)?;
        Ok(match token.kind {
            Char => DataType::Char,
            Void => DataType::Void,
            _ => DataType::Int,
        })
    }

    fn parse_ident(&mut self) -> Result<String, Error> {
        match expect!(self, Identifier(_))?.kind {
            Identifier(name) => Ok(name),
            _ => unreachable!(),
        }
    }

    fn parse_text(&mut self) -> Result<String, Error> {
        match expect!(self, StringLiteral(_))?.kind {
            StringLiteral(text) => Ok(text),
            _ => unreachable!(),
        }
    }

    /// func-def = type ident "(" [ param { "," param } ] ")" block
    fn parse_function(&mut self) -> Result<Function, Error> {
        let pos = self.peek().map(|t| t.pos).ok_or(Error::UnexpectedEof)?;
        let return_type = self.parse_type()?;
        let name = self.parse_ident()?;
        expect!(self, LParen)?;
        let params = repeat!(self, self.parse_param(), Comma, RParen);
        expect!(self, RParen)?;
        let body = self.parse_block()?;
        Ok(Function {
            return_type,
            name,
            params,
            body,
            pos,
        })
    }

    /// param = ( "int" | "char" ) ident
    fn parse_param(&mut self) -> Result<Param, Error> {
        let ty = match optional!(self, Int | Char) {
            Some(Token { kind: Char, .. }) => DataType::Char,
            Some(_) => DataType::Int,
            None => return Err(Error::ExpectedParamType(self.here()?)),
        };
        let name = self.parse_ident()?;
        Ok(Param { ty, name })
    }

    /// decl = type ident [ "[" [ num-lit ] "]" ] [ "=" expr ] ";"
    fn parse_declaration(&mut self) -> Result<Declaration, Error> {
        let pos = self.peek().map(|t| t.pos).ok_or(Error::UnexpectedEof)?;
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        let array = optional!(self, LBracket, {
            let size = match optional!(self, Number(_)) {
                Some(Token { kind: Number(n), .. }) => usize::try_from(literal_value(&n)).unwrap_or(0),
                _ => 0,
            };
            expect!(self, RBracket)?;
            size
        });
        let init = optional!(self, Assign, self.parse_expr()?);
        expect!(self, Semicolon)?;
        Ok(Declaration {
            ty,
            name,
            array,
            init,
            pos,
        })
    }

    /// block = "{" { stmt } "}"
    fn parse_block(&mut self) -> Result<Vec<Stmt>, Error> {
        expect!(self, LBrace)?;
        let stmts = repeat!(self, self.parse_stmt(), RBrace | Eof);
        expect!(self, RBrace)?;
        Ok(stmts)
    }

    /// body = block | stmt
    fn parse_body(&mut self) -> Result<Vec<Stmt>, Error> {
        if check!(self, LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    /// stmt = return-stmt | block | if-stmt | for-stmt | while-stmt | do-stmt
    ///      | printf-stmt | scanf-stmt | decl | call-stmt | update-stmt
    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        let kind = self.peek().map(|t| t.kind.clone()).ok_or(Error::UnexpectedEof)?;
        match kind {
            // Return statement: "return" [ expr ] ";"
            Return => {
                expect!(self, Return)?;
                let expr = if !check!(self, Semicolon) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                expect!(self, Semicolon)?;
                Ok(Stmt::Return(expr))
            }

            // Block statement: "{" { stmt } "}"
            LBrace => Ok(Stmt::Block(self.parse_block()?)),

            // Conditional statement: "if" "(" expr ")" body [ "else" body ]
            If => {
                expect!(self, If)?;
                expect!(self, LParen)?;
                let cond = self.parse_expr()?;
                expect!(self, RParen)?;
                let then = self.parse_body()?;
                let other = optional!(self, Else, self.parse_body()?);
                Ok(Stmt::If(cond, then, other))
            }

            // For loop: "for" "(" [ decl | update ";" ] [ expr ] ";" [ update ] ")" body
            For => {
                expect!(self, For)?;
                expect!(self, LParen)?;
                let init = if optional!(self, Semicolon).is_some() {
                    None
                } else if check!(self, Int | Char) {
                    Some(Box::new(Stmt::Declaration(self.parse_declaration()?)))
                } else {
                    let init = self.parse_update()?;
                    expect!(self, Semicolon)?;
                    Some(Box::new(init))
                };
                let cond = if !check!(self, Semicolon) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                expect!(self, Semicolon)?;
                let update = if !check!(self, RParen) {
                    Some(Box::new(self.parse_update()?))
                } else {
                    None
                };
                expect!(self, RParen)?;
                let body = self.parse_body()?;
                Ok(Stmt::For(init, cond, update, body))
            }

            // While loop: "while" "(" expr ")" body
            While => {
                expect!(self, While)?;
                expect!(self, LParen)?;
                let cond = self.parse_expr()?;
                expect!(self, RParen)?;
                let body = self.parse_body()?;
                Ok(Stmt::While(cond, body))
            }

            // Do-while loop: "do" body "while" "(" expr ")" ";"
            Do => {
                expect!(self, Do)?;
                let body = self.parse_body()?;
                expect!(self, While)?;
                expect!(self, LParen)?;
                let cond = self.parse_expr()?;
                expect!(self, RParen)?;
                expect!(self, Semicolon)?;
                Ok(Stmt::DoWhile(body, cond))
            }

            // Printf: "printf" "(" string-lit { "," expr } ")" ";"
            Printf => {
                expect!(self, Printf)?;
                expect!(self, LParen)?;
                let format = self.parse_text()?;
                let mut args = Vec::new();
                while optional!(self, Comma).is_some() {
                    args.push(self.parse_expr()?);
                }
                expect!(self, RParen)?;
                expect!(self, Semicolon)?;
                Ok(Stmt::Printf(format, args))
            }

            // Scanf: "scanf" "(" string-lit { "," "&" ident } ")" ";"
            Scanf => {
                expect!(self, Scanf)?;
                expect!(self, LParen)?;
                let format = self.parse_text()?;
                let mut names = Vec::new();
                while optional!(self, Comma).is_some() {
                    expect!(self, BitAnd)?;
                    names.push(self.parse_ident()?);
                }
                expect!(self, RParen)?;
                expect!(self, Semicolon)?;
                Ok(Stmt::Scanf(format, names))
            }

            // Local declaration
            Int | Char => Ok(Stmt::Declaration(self.parse_declaration()?)),

            // Call statement: ident "(" [ expr { "," expr } ] ")" ";"
            Identifier(_) if matches!(self.peek_nth(1), Some(Token { kind: LParen, .. })) => {
                let call = self.parse_call()?;
                expect!(self, Semicolon)?;
                Ok(Stmt::Expr(call))
            }

            // Update statement: update ";"
            Identifier(_) | Increment | Decrement => {
                let stmt = self.parse_update()?;
                expect!(self, Semicolon)?;
                Ok(stmt)
            }

            _ => Err(self.unexpected("statement")),
        }
    }

    /// update = ident [ "[" expr "]" ] ( ( "=" | "+=" | "-=" ) expr | "++" | "--" )
    ///        | ( "++" | "--" ) ident [ "[" expr "]" ]
    fn parse_update(&mut self) -> Result<Stmt, Error> {
        if let Some(token) = optional!(self, Increment | Decrement) {
            let op = step_op(&token);
            let target = self.parse_target()?;
            return Ok(Stmt::Expr(Expr::Unary(op, Box::new(target))));
        }

        let at = self.here()?;
        let name = self.parse_ident()?;
        let index = optional!(self, LBracket, {
            let index = self.parse_expr()?;
            expect!(self, RBracket)?;
            index
        });

        let Some(token) = self.next() else {
            return Err(Error::UnexpectedEof);
        };
        let op = match token.kind {
            Assign => AssignOp::Assign,
            PlusAssign => AssignOp::AddAssign,
            MinusAssign => AssignOp::SubAssign,
            Increment | Decrement => {
                let target = Expr::Ident(name, index.map(Box::new));
                return Ok(Stmt::Expr(Expr::Unary(step_op(&token), Box::new(target))));
            }
            _ => return Err(Error::ExpectedAssignment(at)),
        };
        let expr = self.parse_expr()?;
        Ok(Stmt::Assignment(name, index, op, expr))
    }

    /// target = ident [ "[" expr "]" ]
    fn parse_target(&mut self) -> Result<Expr, Error> {
        let name = self.parse_ident()?;
        let index = optional!(self, LBracket, {
            let index = self.parse_expr()?;
            expect!(self, RBracket)?;
            Box::new(index)
        });
        Ok(Expr::Ident(name, index))
    }

    /// call = ident "(" [ expr { "," expr } ] ")"
    fn parse_call(&mut self) -> Result<Expr, Error> {
        let name = self.parse_ident()?;
        expect!(self, LParen)?;
        let args = repeat!(self, self.parse_expr(), Comma, RParen);
        expect!(self, RParen)?;
        Ok(Expr::Call(name, args))
    }

    /// Next token as diagnostic info
    fn here(&mut self) -> Result<TokenInfo, Error> {
        self.peek().map(TokenInfo::from).ok_or(Error::UnexpectedEof)
    }
}

// ----------------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------------

impl<I: Iterator<Item = Token>> Parser<I> {
    /// expr = logic-or-expr
    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.parse_logic_or_expr()
    }

    /// Left-associative binary level: next { op next }
    fn parse_binary<F, G>(&mut self, next: F, op: G) -> Result<Expr, Error>
    where
        F: Fn(&mut Self) -> Result<Expr, Error>,
        G: Fn(&Token) -> Option<BinaryOp>,
    {
        let mut lhs = next(self)?;
        while let Some(op) = self.peek().and_then(&op) {
            self.next();
            let rhs = next(self)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// logic-or-expr = logic-and-expr { "||" logic-and-expr }
    fn parse_logic_or_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_logic_and_expr, |t| match t.kind {
            Or => Some(BinaryOp::LogicOr),
            _ => None,
        })
    }

    /// logic-and-expr = or-expr { "&&" or-expr }
    fn parse_logic_and_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_or_expr, |t| match t.kind {
            And => Some(BinaryOp::LogicAnd),
            _ => None,
        })
    }

    /// or-expr = xor-expr { "|" xor-expr }
    fn parse_or_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_xor_expr, |t| match t.kind {
            BitOr => Some(BinaryOp::Or),
            _ => None,
        })
    }

    /// xor-expr = and-expr { "^" and-expr }
    fn parse_xor_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_and_expr, |t| match t.kind {
            BitXor => Some(BinaryOp::Xor),
            _ => None,
        })
    }

    /// and-expr = eq-expr { "&" eq-expr }
    fn parse_and_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_eq_expr, |t| match t.kind {
            BitAnd => Some(BinaryOp::And),
            _ => None,
        })
    }

    /// eq-expr = relat-expr { ( "==" | "!=" ) relat-expr }
    fn parse_eq_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_relat_expr, |t| match t.kind {
            Eq => Some(BinaryOp::Eq),
            Ne => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    /// relat-expr = shift-expr { ( "<" | ">" | "<=" | ">=" ) shift-expr }
    fn parse_relat_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_shift_expr, |t| match t.kind {
            Lt => Some(BinaryOp::Lt),
            Gt => Some(BinaryOp::Gt),
            Le => Some(BinaryOp::Le),
            Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    /// shift-expr = add-expr { ( "<<" | ">>" ) add-expr }
    fn parse_shift_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_add_expr, |t| match t.kind {
            LeftShift => Some(BinaryOp::Shl),
            RightShift => Some(BinaryOp::Shr),
            _ => None,
        })
    }

    /// add-expr = mul-expr { ( "+" | "-" ) mul-expr }
    fn parse_add_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_mul_expr, |t| match t.kind {
            Plus => Some(BinaryOp::Add),
            Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    /// mul-expr = unary-expr { ( "*" | "/" | "%" ) unary-expr }
    fn parse_mul_expr(&mut self) -> Result<Expr, Error> {
        self.parse_binary(Self::parse_unary_expr, |t| match t.kind {
            Multiply => Some(BinaryOp::Mul),
            Divide => Some(BinaryOp::Div),
            Modulo => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    /// unary-expr = ( "!" | "-" | "++" | "--" ) unary-expr | primary-expr
    fn parse_unary_expr(&mut self) -> Result<Expr, Error> {
        let op = match self.peek().map(|t| &t.kind) {
            Some(Not) => UnaryOp::Not,
            Some(Minus) => UnaryOp::Neg,
            Some(Increment) => UnaryOp::Inc,
            Some(Decrement) => UnaryOp::Dec,
            _ => return self.parse_primary_expr(),
        };
        self.next();
        let operand = self.parse_unary_expr()?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    /// primary-expr = num-lit | char-lit | string-lit | call | target | "(" expr ")"
    fn parse_primary_expr(&mut self) -> Result<Expr, Error> {
        let kind = self.peek().map(|t| t.kind.clone()).ok_or(Error::UnexpectedEof)?;
        match kind {
            Number(n) => {
                self.next();
                Ok(Expr::Number(n))
            }
            CharLiteral(c) => {
                self.next();
                Ok(Expr::Char(c))
            }
            StringLiteral(s) => {
                self.next();
                Ok(Expr::String(s))
            }
            Identifier(_) if matches!(self.peek_nth(1), Some(Token { kind: LParen, .. })) => {
                self.parse_call()
            }
            Identifier(_) => self.parse_target(),
            LParen => {
                expect!(self, LParen)?;
                let expr = self.parse_expr()?;
                expect!(self, RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}

fn step_op(token: &Token) -> UnaryOp {
    match token.kind {
        Decrement => UnaryOp::Dec,
        _ => UnaryOp::Inc,
    }
}
